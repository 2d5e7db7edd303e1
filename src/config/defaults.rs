//! Default configuration constants.

use crate::tui::settings::{PROMPT_DEFAULT_PAGE_SIZE, SPINNER_TICK_MS};

/// Local config file looked up in the working directory.
pub(super) const LOCAL_CONFIG_FILE: &str = "strata.toml";
/// Directory under the user config root that holds the global config.
pub(super) const GLOBAL_CONFIG_DIR: &str = "strata";
/// Filter applied to the log file when neither `RUST_LOG` nor config set one.
pub(super) const DEFAULT_LOG_LEVEL: &str = "info";
pub(super) const DEFAULT_SPINNER_INTERVAL_MS: u64 = SPINNER_TICK_MS;
pub(super) const DEFAULT_PAGE_SIZE: usize = PROMPT_DEFAULT_PAGE_SIZE;

/// Env var that disables colored output when set to anything but `0`/`false`.
pub(super) const ENV_NO_COLOR: &str = "STRATA_NO_COLOR";
/// Env var overriding `display.spinner_interval_ms`.
pub(super) const ENV_SPINNER_MS: &str = "STRATA_SPINNER_MS";
/// Env var overriding `logging.file`.
pub(super) const ENV_LOG_FILE: &str = "STRATA_LOG_FILE";
