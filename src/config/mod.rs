//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`STRATA_NO_COLOR`, `STRATA_SPINNER_MS`,
//!    `STRATA_LOG_FILE`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./strata.toml in the current directory
//! 4. $XDG_CONFIG_HOME/strata/strata.toml (or ~/.config/strata/strata.toml)
//! 5. Built-in defaults

use crate::error::ConfigError;
use std::path::{Path, PathBuf};
use tracing::debug;

mod defaults;
mod sources;
mod types;

use defaults::{ENV_LOG_FILE, ENV_NO_COLOR, ENV_SPINNER_MS};
use sources::read_config_text_with_sources;
pub use sources::config_root_dir;
pub use types::{Config, DisplayConfig, LoggingConfig, PromptConfig};

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&Path>) -> Result<Config, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&Path>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<Config, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (text, source) = read_config_text_with_sources(path_override, &read_file, &config_root)?;
    debug!(?source, "config source resolved");
    let mut config: Config = toml::from_str(&text)?;
    apply_env_overrides(&mut config, &env_lookup)?;
    validate(&config)?;
    Ok(config)
}

fn apply_env_overrides<FEnv>(config: &mut Config, env_lookup: &FEnv) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(value) = env_lookup(ENV_NO_COLOR) {
        let value = value.trim().to_ascii_lowercase();
        if !matches!(value.as_str(), "" | "0" | "false") {
            config.display.color = false;
        }
    }
    if let Some(value) = env_lookup(ENV_SPINNER_MS) {
        config.display.spinner_interval_ms = value.trim().parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid {ENV_SPINNER_MS} value `{value}`: expected positive integer milliseconds"
            ))
        })?;
    }
    if let Some(value) = env_lookup(ENV_LOG_FILE) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            config.logging.file = Some(PathBuf::from(trimmed));
        }
    }
    Ok(())
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.display.spinner_interval_ms == 0 {
        return Err(ConfigError::Invalid(
            "display.spinner_interval_ms must be greater than 0".to_string(),
        ));
    }
    if config.prompt.page_size == 0 {
        return Err(ConfigError::Invalid(
            "prompt.page_size must be greater than 0".to_string(),
        ));
    }
    if config.logging.level.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "logging.level must not be empty".to_string(),
        ));
    }
    crate::ui::theme::Palette::default()
        .with_overrides(&config.display.colors)
        .map_err(|e| ConfigError::Invalid(format!("display.colors: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;

    fn files(entries: &[(&str, &str)]) -> impl Fn(&Path) -> Result<String, io::Error> {
        let map: HashMap<PathBuf, String> = entries
            .iter()
            .map(|(path, text)| (PathBuf::from(path), text.to_string()))
            .collect();
        move |path: &Path| {
            map.get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "missing"))
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn root() -> Option<PathBuf> {
        Some(PathBuf::from("/cfg"))
    }

    #[test]
    fn defaults_apply_without_any_file() {
        let config = load_config_from_sources(None, files(&[]), no_env, root).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.display.color);
        assert_eq!(config.display.spinner_interval_ms, 150);
        assert_eq!(config.prompt.page_size, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn local_file_wins_over_global() {
        // ./strata.toml shadows the per-user file entirely.
        let read = files(&[
            ("strata.toml", "[prompt]\npage_size = 3\n"),
            ("/cfg/strata/strata.toml", "[prompt]\npage_size = 8\n"),
        ]);
        let config = load_config_from_sources(None, read, no_env, root).unwrap();
        assert_eq!(config.prompt.page_size, 3);
    }

    #[test]
    fn global_file_is_used_when_no_local_file() {
        let read = files(&[("/cfg/strata/strata.toml", "[display]\ncolor = false\n")]);
        let config = load_config_from_sources(None, read, no_env, root).unwrap();
        assert!(!config.display.color);
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_config_from_sources(
            Some(Path::new("/nope.toml")),
            files(&[("strata.toml", "")]),
            no_env,
            root,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn env_overrides_file_values() {
        let read = files(&[(
            "custom.toml",
            "[display]\ncolor = true\nspinner_interval_ms = 300\n",
        )]);
        let env = |name: &str| match name {
            "STRATA_NO_COLOR" => Some("1".to_string()),
            "STRATA_SPINNER_MS" => Some("75".to_string()),
            "STRATA_LOG_FILE" => Some("/tmp/strata.log".to_string()),
            _ => None,
        };
        let config =
            load_config_from_sources(Some(Path::new("custom.toml")), read, env, root).unwrap();
        assert!(!config.display.color);
        assert_eq!(config.display.spinner_interval_ms, 75);
        assert_eq!(
            config.logging.file.as_deref(),
            Some(Path::new("/tmp/strata.log"))
        );
    }

    #[test]
    fn no_color_env_accepts_false() {
        let env = |name: &str| (name == "STRATA_NO_COLOR").then(|| "false".to_string());
        let config = load_config_from_sources(None, files(&[]), env, root).unwrap();
        assert!(config.display.color);
    }

    #[test]
    fn zero_spinner_interval_is_rejected() {
        let read = files(&[("strata.toml", "[display]\nspinner_interval_ms = 0\n")]);
        let err = load_config_from_sources(None, read, no_env, root).unwrap_err();
        assert!(err.to_string().contains("spinner_interval_ms"), "got: {err}");
    }

    #[test]
    fn bad_env_number_is_rejected() {
        let env = |name: &str| (name == "STRATA_SPINNER_MS").then(|| "fast".to_string());
        let err = load_config_from_sources(None, files(&[]), env, root).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bad_color_override_is_rejected() {
        let read = files(&[("strata.toml", "[display.colors]\nerror = \"#zz\"\n")]);
        let err = load_config_from_sources(None, read, no_env, root).unwrap_err();
        assert!(err.to_string().contains("display.colors"), "got: {err}");
    }

    #[test]
    fn explicit_file_is_read_from_disk() {
        let dir = crate::testsupport::TestTempDir::new("config");
        let path = dir.write_text(
            "nested/custom.toml",
            "[prompt]\npage_size = 9\n\n[logging]\nlevel = \"debug\"\n",
        );
        let config = load_config_from_sources(
            Some(&path),
            |path: &Path| std::fs::read_to_string(path),
            no_env,
            root,
        )
        .unwrap();
        assert_eq!(config.prompt.page_size, 9);
        assert_eq!(config.logging.level, "debug");
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn malformed_toml_is_a_toml_error() {
        let read = files(&[("strata.toml", "[display\n")]);
        let err = load_config_from_sources(None, read, no_env, root).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
