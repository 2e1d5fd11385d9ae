// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::{error::Error, fmt};

use ratatui::style::{Color, Modifier, Style};

use crate::config::{parse_hex_rgb, Config};
use crate::model::Relevance;

const PANEL_BORDER_COLOR: Color = Color::LightGreen;

#[derive(Debug, Clone)]
pub(crate) struct TuiTheme {
    high: Color,
    low: Color,
}

impl Default for TuiTheme {
    fn default() -> Self {
        Self { high: Color::Rgb(0x4a, 0x90, 0xe2), low: Color::Rgb(0xff, 0xa7, 0x26) }
    }
}

impl TuiTheme {
    pub(crate) fn from_config(config: &Config) -> Result<Self, ThemeError> {
        let high = parse_palette_color("high_color", &config.high_color)?;
        let low = parse_palette_color("low_color", &config.low_color)?;
        Ok(Self { high, low })
    }

    pub(crate) fn relevance_color(&self, relevance: Relevance) -> Color {
        match relevance {
            Relevance::High => self.high,
            Relevance::Low => self.low,
        }
    }

    /// Style of a highlighted span in the passage preview.
    pub(crate) fn mark_style(&self, relevance: Relevance) -> Style {
        Style::default()
            .fg(Color::White)
            .bg(self.relevance_color(relevance))
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn relevance_style(&self, relevance: Relevance) -> Style {
        Style::default().fg(self.relevance_color(relevance)).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn panel_border_style(&self) -> Style {
        Style::default().fg(PANEL_BORDER_COLOR)
    }

    pub(crate) fn selection_style(&self) -> Style {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    pub(crate) fn stale_style(&self) -> Style {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
    }

    pub(crate) fn error_style(&self) -> Style {
        Style::default().fg(Color::Red)
    }
}

fn parse_palette_color(field: &'static str, value: &str) -> Result<Color, ThemeError> {
    let (r, g, b) = parse_hex_rgb(value).map_err(|reason| ThemeError::InvalidColor {
        field,
        value: format!("{} ({reason})", value.trim()),
    })?;
    Ok(Color::Rgb(r, g, b))
}

#[derive(Debug, Clone)]
pub(crate) enum ThemeError {
    InvalidColor { field: &'static str, value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidColor { field, value } => write!(f, "invalid {field}={value}"),
        }
    }
}

impl Error for ThemeError {}
