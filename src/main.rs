// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Piimark CLI entrypoint.
//!
//! Loads the configuration, starts file logging, optionally loads a JSONL batch and runs the
//! annotation TUI.

use std::error::Error;
use std::path::PathBuf;

use piimark::config::Config;
use piimark::session::Editor;
use piimark::store::FileError;
use piimark::tui::TuiSettings;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<input.jsonl>] [--output <path>] [--config <path>] [--log-dir <dir>]\n\nWithout an input file the editor starts empty; press `o` to open a batch.\n--output overrides the export path (default from config, `annotated.jsonl`).\n--config reads an alternate TOML config instead of the per-user one.\n--log-dir overrides where `piimark.log` is written."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    log_dir: Option<PathBuf>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        let slot = match arg.as_str() {
            "--output" => &mut options.output,
            "--config" => &mut options.config,
            "--log-dir" => &mut options.log_dir,
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.input.is_some() {
                    return Err(());
                }
                options.input = Some(PathBuf::from(arg));
                continue;
            }
        };
        if slot.is_some() {
            return Err(());
        }
        let value = args.next().ok_or(())?;
        *slot = Some(PathBuf::from(value));
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "piimark".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let mut config = match options.config.as_deref() {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        if let Some(output) = options.output {
            config.export_path = output;
        }
        if let Some(log_dir) = options.log_dir {
            config.log_dir = log_dir;
        }

        let _log_guard = match piimark::logging::init(&config.log_dir) {
            Ok(guard) => guard,
            Err(err) => {
                eprintln!("piimark: logging disabled ({}): {err}", config.log_dir.display());
                None
            }
        };
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

        let editor = match options.input {
            Some(path) => {
                let store = piimark::store::read_batch(&path)?;
                tracing::info!(records = store.len(), "loaded batch from command line");
                Editor::with_store(store)
            }
            None => Editor::new(),
        };

        let settings = TuiSettings::from_config(&config)?;
        piimark::tui::run(editor, settings)
    })();

    if let Err(err) = result {
        match err.downcast_ref::<FileError>() {
            Some(file_err) => {
                tracing::error!(code = file_err.code(), line = ?file_err.line(), "fatal error");
            }
            None => tracing::error!(%err, "fatal error"),
        }
        eprintln!("piimark: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::parse_options;

    fn args(values: &[&str]) -> impl Iterator<Item = String> {
        values.iter().map(|value| (*value).to_owned()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_empty_args() {
        let options = parse_options(args(&[])).expect("parse options");
        assert_eq!(options, Default::default());
    }

    #[test]
    fn parses_positional_input() {
        let options = parse_options(args(&["batch.jsonl"])).expect("parse options");
        assert_eq!(options.input, Some(PathBuf::from("batch.jsonl")));
        assert_eq!(options.output, None);
    }

    #[test]
    fn parses_all_flags_in_any_order() {
        let options = parse_options(args(&[
            "--log-dir",
            "logs",
            "in.jsonl",
            "--output",
            "out.jsonl",
            "--config",
            "piimark.toml",
        ]))
        .expect("parse options");
        assert_eq!(options.input, Some(PathBuf::from("in.jsonl")));
        assert_eq!(options.output, Some(PathBuf::from("out.jsonl")));
        assert_eq!(options.config, Some(PathBuf::from("piimark.toml")));
        assert_eq!(options.log_dir, Some(PathBuf::from("logs")));
    }

    #[test]
    fn rejects_unknown_args() {
        parse_options(args(&["--nope"])).unwrap_err();
        parse_options(args(&["-o", "out.jsonl"])).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_flags() {
        parse_options(args(&["--output", "a", "--output", "b"])).unwrap_err();
        parse_options(args(&["--config", "a", "--config", "b"])).unwrap_err();
    }

    #[test]
    fn rejects_multiple_positional_inputs() {
        parse_options(args(&["one.jsonl", "two.jsonl"])).unwrap_err();
    }

    #[test]
    fn rejects_missing_flag_value() {
        parse_options(args(&["--output"])).unwrap_err();
        parse_options(args(&["in.jsonl", "--log-dir"])).unwrap_err();
    }
}
