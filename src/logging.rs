// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! File logging through `tracing`.
//!
//! The terminal belongs to the UI, so events go to `piimark.log` in the configured directory.
//! Events carry indices, counts, types and error codes. Errors whose message can quote a record
//! (batch parse failures) are logged by code and line, so record text never reaches the file.

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "piimark.log";
const DEFAULT_FILTER: &str = "piimark=info";

/// Installs the global subscriber writing to `dir/piimark.log`.
///
/// Returns the writer guard; dropping it flushes and stops the writer. Returns `Ok(None)` when a
/// global subscriber is already installed.
pub fn init(dir: &Path) -> io::Result<Option<WorkerGuard>> {
    fs::create_dir_all(dir)?;
    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    Ok(installed.ok().map(|()| guard))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
