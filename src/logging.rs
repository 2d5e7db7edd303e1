//! Diagnostic logging setup.
//!
//! Every byte on the terminal belongs to some view's line accounting, so logs
//! never go to stdout or stderr. They are appended to the configured file, or
//! dropped when there is none.

use crate::config::LoggingConfig;
use crate::error::ConfigError;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` when set, else the configured level.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, ConfigError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(config.level.trim())
        .map_err(|e| ConfigError::Invalid(format!("logging.level `{}`: {e}", config.level)))
}

/// Install the global subscriber. Returns `false` when logging stays off.
pub fn init(config: &LoggingConfig) -> Result<bool, ConfigError> {
    let Some(path) = config.file.as_ref() else {
        return Ok(false);
    };
    let filter = build_filter(config)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok();
    if installed {
        tracing::info!(version = crate::build_info::VERSION, "logging started");
    }
    Ok(installed)
}
