//! Structured logging setup.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the application. [`init_logging`] is a convenience for binaries, tests
//! and benches that want the events printed.
//!
//! `RUST_LOG` takes precedence over the configured level when set.

use crate::config::LoggingConfig;
use crate::error::{CodecError, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Install a global subscriber built from `config`.
///
/// # Errors
/// Returns `CodecError::ConfigError` if the configuration is invalid, the
/// log file cannot be opened, or a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    config.validate_strict_outputs()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_ascii_lowercase()));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(!config.log_to_file);

    let installed = match (config.log_to_file, &config.log_file_path) {
        (true, Some(path)) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    CodecError::ConfigError(format!("Failed to open log file '{path}': {e}"))
                })?;
            let writer = Mutex::new(file);
            if config.json_format {
                builder.json().with_writer(writer).try_init()
            } else {
                builder.with_writer(writer).try_init()
            }
        }
        _ if config.json_format => builder.json().try_init(),
        _ => builder.try_init(),
    };

    installed.map_err(|e| CodecError::ConfigError(format!("Failed to install logger: {e}")))?;

    tracing::info!(app = %config.app_name, level = %config.log_level, "Logging initialized");
    Ok(())
}

impl LoggingConfig {
    fn validate_strict_outputs(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CodecError::ConfigError(format!(
                "Invalid logging configuration:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}
