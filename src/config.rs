// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! User configuration loaded from a TOML file.
//!
//! Every field is optional; missing fields fall back to their defaults. A missing file is
//! replaced by a freshly written default file.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::render::highlight::{DEFAULT_HIGH_COLOR, DEFAULT_LOW_COLOR};
use crate::render::HighlightPalette;
use crate::store::file::DEFAULT_EXPORT_FILE_NAME;

const APP_DIR: &str = "piimark";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_export_path")]
    pub export_path: PathBuf,

    #[serde(default = "default_high_color")]
    pub high_color: String,

    #[serde(default = "default_low_color")]
    pub low_color: String,

    #[serde(default = "default_toast_seconds")]
    pub toast_seconds: u64,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

fn default_export_path() -> PathBuf {
    PathBuf::from(DEFAULT_EXPORT_FILE_NAME)
}

fn default_high_color() -> String {
    DEFAULT_HIGH_COLOR.to_owned()
}

fn default_low_color() -> String {
    DEFAULT_LOW_COLOR.to_owned()
}

fn default_toast_seconds() -> u64 {
    2
}

fn default_log_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path.push("logs");
    path
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export_path: default_export_path(),
            high_color: default_high_color(),
            low_color: default_low_color(),
            toast_seconds: default_toast_seconds(),
            log_dir: default_log_dir(),
        }
    }
}

impl Config {
    /// Loads from the default location under the user's config directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads from `path`, writing a default file there when none exists.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let config = Self::default();
                match config.save_to(path) {
                    Ok(()) => info!(path = %path.display(), "wrote default config"),
                    Err(err) => warn!(%err, "could not write default config"),
                }
                return Ok(config);
            }
            Err(source) => {
                return Err(ConfigError::Io { path: path.to_path_buf(), source });
            }
        };

        Self::parse(&contents).map_err(|err| err.with_path(path))
    }

    /// Parses and validates TOML text.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents).map_err(|source| ConfigError::Toml {
            path: None,
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|source| ConfigError::Io { path: parent.to_path_buf(), source })?;
        }
        let text = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, text).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })
    }

    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path.push(CONFIG_FILE_NAME);
        path
    }

    pub fn palette(&self) -> HighlightPalette {
        HighlightPalette { high: self.high_color.clone(), low: self.low_color.clone() }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("high_color", &self.high_color), ("low_color", &self.low_color)] {
            parse_hex_rgb(value).map_err(|reason| ConfigError::InvalidColor {
                field,
                value: value.clone(),
                reason,
            })?;
        }
        Ok(())
    }
}

/// Parses `#RRGGBB` into its channels.
pub fn parse_hex_rgb(value: &str) -> Result<(u8, u8, u8), String> {
    let trimmed = value.trim();
    let Some(hex) = trimmed.strip_prefix('#') else {
        return Err(format!("missing '#' prefix in {trimmed:?}"));
    };
    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color {trimmed:?} (expected #RRGGBB)"));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color {trimmed:?}"))?;
    Ok((((rgb >> 16) & 0xFF) as u8, ((rgb >> 8) & 0xFF) as u8, (rgb & 0xFF) as u8))
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Toml { path: Option<PathBuf>, source: toml::de::Error },
    Serialize(toml::ser::Error),
    InvalidColor { field: &'static str, value: String, reason: String },
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        match self {
            Self::Toml { source, .. } => Self::Toml { path: Some(path.to_path_buf()), source },
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "config io error at {}: {source}", path.display())
            }
            Self::Toml { path: Some(path), source } => {
                write!(f, "invalid config {}: {source}", path.display())
            }
            Self::Toml { path: None, source } => write!(f, "invalid config: {source}"),
            Self::Serialize(source) => write!(f, "failed to serialize config: {source}"),
            Self::InvalidColor { field, value, reason } => {
                write!(f, "invalid {field} {value:?}: {reason}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Toml { source, .. } => Some(source),
            Self::Serialize(source) => Some(source),
            Self::InvalidColor { .. } => None,
        }
    }
}
