// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::{ParseError, RecordStore};

/// Default export file name, relative to the working directory.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "annotated.jsonl";

/// Reads a UTF-8 JSONL batch from `path`.
pub fn read_batch(path: impl AsRef<Path>) -> Result<RecordStore, FileError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|source| FileError::Io { path: path.to_path_buf(), source })?;
    RecordStore::load(contents.lines())
        .map_err(|source| FileError::Parse { path: path.to_path_buf(), source })
}

/// Writes exported lines (joined with `\n`) to `path`, replacing it atomically.
pub fn write_export(path: impl AsRef<Path>, lines: &[String]) -> Result<(), FileError> {
    let path = path.as_ref();
    write_atomic(path, lines.join("\n").as_bytes())
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), FileError> {
    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(FileError::SymlinkRefused { path: path.to_path_buf() });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => return Err(FileError::Io { path: path.to_path_buf(), source }),
    }

    let Some(file_name) = path.file_name() else {
        return Err(FileError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    let tmp_path =
        parent.join(format!(".piimark.tmp.{}.{}", file_name.to_string_lossy(), nanos));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| FileError::Io { path: tmp_path.clone(), source })?;
    file.write_all(contents).map_err(|source| FileError::Io { path: tmp_path.clone(), source })?;
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(FileError::Io { path: path.to_path_buf(), source });
    }

    Ok(())
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

#[derive(Debug)]
pub enum FileError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: ParseError },
    Serialize { source: serde_json::Error },
    SymlinkRefused { path: PathBuf },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Parse { path, source } => write!(f, "cannot load {path:?}: {source}"),
            Self::Serialize { source } => write!(f, "cannot serialize records: {source}"),
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
        }
    }
}

impl FileError {
    /// Stable kind for logs. `Display` may quote record text, this never does.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "file.io",
            Self::Parse { source: ParseError::Empty, .. } => "file.parse.empty",
            Self::Parse { source: ParseError::Malformed { .. }, .. } => "file.parse.malformed",
            Self::Serialize { .. } => "file.serialize",
            Self::SymlinkRefused { .. } => "file.symlink_refused",
        }
    }

    /// 1-based line of the first bad record, for parse failures.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Parse { source: ParseError::Malformed { line, .. }, .. } => Some(*line),
            _ => None,
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Serialize { source } => Some(source),
            Self::SymlinkRefused { .. } => None,
        }
    }
}

impl From<serde_json::Error> for FileError {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize { source }
    }
}
