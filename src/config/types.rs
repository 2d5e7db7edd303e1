//! Configuration data model.
//!
//! Every section deserializes with `#[serde(default)]`, so a partial file
//! only overrides the keys it names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::defaults::{DEFAULT_LOG_LEVEL, DEFAULT_PAGE_SIZE, DEFAULT_SPINNER_INTERVAL_MS};

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub prompt: PromptConfig,
    pub logging: LoggingConfig,
}

/// Terminal output settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
    /// Delay between spinner frames of running tasks.
    pub spinner_interval_ms: u64,
    /// Semantic color overrides (`success`, `warning`, `error`, `plain`).
    pub colors: BTreeMap<String, String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            spinner_interval_ms: DEFAULT_SPINNER_INTERVAL_MS,
            colors: BTreeMap::new(),
        }
    }
}

/// Question prompt settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PromptConfig {
    /// Rows shown at once by enum pickers.
    pub page_size: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Diagnostic log settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Log destination. Nothing is logged without one.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}
