//! Logging setup for filestash.
//!
//! Log output goes to the console and, when [`init`] is used, to the file
//! named in `[logging]`. `RUST_LOG` overrides the configured level.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Normalize a configured level string to an env-filter directive.
fn normalize_level(level: &str) -> &'static str {
    match level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    }
}

/// Build the level filter: `RUST_LOG` wins, the config level is the default.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(normalize_level(level)))
}

/// Initialize logging to the console and the configured log file.
///
/// The log file's directory is created if missing; the file itself is
/// truncated on startup.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let log_path = Path::new(&config.file);
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let log_file = Arc::new(File::create(log_path)?);

    tracing_subscriber::registry()
        .with(build_filter(&config.level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout.and(log_file))
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    Ok(())
}

/// Initialize console-only logging (fallback when the log file is
/// unavailable, and for development).
pub fn init_console_only(level: &str) {
    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .init();
}
