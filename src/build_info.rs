//! Compile-time build metadata exposed to the CLI.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured at build time.
pub const GIT_COMMIT: &str = env!("STRATA_BUILD_GIT_HASH");

/// Build timestamp captured at compile time.
pub const BUILD_TIMESTAMP: &str = env!("STRATA_BUILD_TIMESTAMP");

/// Render the version block printed by `strata --version`.
pub fn cli_version_text() -> String {
    format!("{VERSION} (commit {GIT_COMMIT}, built {BUILD_TIMESTAMP})")
}
