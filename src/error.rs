//! Unified error types for the view engine, flags and command shell.

use std::fmt;

use crate::tui::prompt::PromptKind;

// ---------------------------------------------------------------------------
// PromptError
// ---------------------------------------------------------------------------

/// Errors raised by the prompt collaborator.
#[derive(Debug)]
pub enum PromptError {
    /// Reading input or writing the question failed.
    Io(std::io::Error),
    /// The user aborted the question (Esc, Ctrl-C or end of input).
    Cancelled,
    /// The collaborator answered with a value of the wrong kind.
    Mismatch(PromptKind),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Cancelled => write!(f, "prompt cancelled"),
            Self::Mismatch(kind) => write!(f, "prompt answered with a non-{kind} value"),
        }
    }
}

impl std::error::Error for PromptError {}

impl From<std::io::Error> for PromptError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// UiError
// ---------------------------------------------------------------------------

/// Errors from creating, initializing or repainting views.
#[derive(Debug)]
pub enum UiError {
    Io(std::io::Error),
    Prompt(PromptError),
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "terminal: {e}"),
            Self::Prompt(e) => write!(f, "prompt: {e}"),
        }
    }
}

impl std::error::Error for UiError {}

impl From<std::io::Error> for UiError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<PromptError> for UiError {
    fn from(e: PromptError) -> Self {
        Self::Prompt(e)
    }
}

// ---------------------------------------------------------------------------
// FlagError
// ---------------------------------------------------------------------------

/// Validation failures for one flag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagError {
    /// A required flag was not supplied.
    Missing(String),
    /// The supplied value does not fit the flag's kind.
    Invalid(String),
}

impl fmt::Display for FlagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "Flag (--{name}) cannot be undefined."),
            Self::Invalid(name) => write!(f, "Flag (--{name}) has an invalid value."),
        }
    }
}

impl std::error::Error for FlagError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or validating configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// Top-level error type for command registration and dispatch.
#[derive(Debug)]
pub enum CliError {
    /// Help or dispatch was requested for a name nobody registered.
    UnknownCommand(String),
    /// Two commands were registered under the same name.
    DuplicateCommand(String),
    /// A flag reuses a name the command line already claims.
    ReservedFlag(String),
    /// Two flags of one command share a long or short name.
    DuplicateFlag(String),
    /// Argument vector did not match the generated command tree.
    Usage(String),
    Flag(FlagError),
    Ui(UiError),
    /// A command body reported a failure of its own.
    Command(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(name) => write!(f, "unknown command '{name}'"),
            Self::DuplicateCommand(name) => {
                write!(f, "tried to register command '{name}' twice")
            }
            Self::ReservedFlag(name) => write!(f, "flag '{name}' is reserved"),
            Self::DuplicateFlag(name) => write!(f, "flag '{name}' is defined twice"),
            Self::Usage(msg) => write!(f, "usage: {msg}"),
            Self::Flag(e) => write!(f, "{e}"),
            Self::Ui(e) => write!(f, "ui: {e}"),
            Self::Command(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<FlagError> for CliError {
    fn from(e: FlagError) -> Self {
        Self::Flag(e)
    }
}

impl From<UiError> for CliError {
    fn from(e: UiError) -> Self {
        Self::Ui(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_error_messages_name_the_flag() {
        assert_eq!(
            FlagError::Missing("service".into()).to_string(),
            "Flag (--service) cannot be undefined."
        );
        assert_eq!(
            FlagError::Invalid("age".into()).to_string(),
            "Flag (--age) has an invalid value."
        );
    }

    #[test]
    fn ui_error_wraps_prompt_failures() {
        // Prompt failures surface through the ui layer with their own prefix.
        let e = UiError::from(PromptError::Cancelled);
        assert_eq!(e.to_string(), "prompt: prompt cancelled");
    }

    #[test]
    fn prompt_mismatch_names_the_expected_kind() {
        let e = PromptError::Mismatch(PromptKind::Number);
        assert_eq!(e.to_string(), "prompt answered with a non-number value");
    }

    #[test]
    fn config_error_from_toml() {
        let toml_err: toml::de::Error = toml::from_str::<toml::Value>("x = [unclosed").unwrap_err();
        let e = ConfigError::from(toml_err);
        assert!(e.to_string().starts_with("toml:"));
    }

    #[test]
    fn cli_error_from_ui_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let e = CliError::from(UiError::from(io_err));
        assert!(e.to_string().starts_with("ui: terminal:"), "got: {e}");
    }

    #[test]
    fn duplicate_command_message() {
        assert_eq!(
            CliError::DuplicateCommand("deploy".into()).to_string(),
            "tried to register command 'deploy' twice"
        );
    }

    #[test]
    fn reserved_flag_message() {
        assert_eq!(
            CliError::ReservedFlag("-c".into()).to_string(),
            "flag '-c' is reserved"
        );
    }
}
