//! Typed flag descriptors and value parsing.
//!
//! Flags arrive as raw strings (from the command line or from an interactive
//! answer) and are validated against their [`FlagKind`].

use crate::error::FlagError;
use std::fmt;

mod help;

pub use help::help_block;

/// Value shape a flag accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagKind {
    /// `1`, `0`, `true` or `false`.
    Boolean,
    /// One of a fixed set of strings.
    Enum { choices: Vec<String> },
    Number,
    String,
}

impl FlagKind {
    /// Placeholder shown in help output.
    pub fn argument_type(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Enum { .. } => "string",
            Self::Number => "number",
            Self::String => "string",
        }
    }
}

/// Parsed flag value.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Boolean(bool),
    Number(f64),
    /// String and enum flags.
    String(String),
}

impl FlagValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
        }
    }
}

/// One flag a command accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDefinition {
    pub long_name: String,
    pub short_name: Option<char>,
    pub description: String,
    pub kind: FlagKind,
    pub optional: bool,
}

impl FlagDefinition {
    fn new(
        kind: FlagKind,
        long_name: impl Into<String>,
        short_name: Option<char>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            long_name: long_name.into(),
            short_name,
            description: description.into(),
            kind,
            optional: false,
        }
    }

    pub fn boolean(
        long_name: impl Into<String>,
        short_name: Option<char>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(FlagKind::Boolean, long_name, short_name, description)
    }

    pub fn enumeration<I, S>(
        long_name: impl Into<String>,
        short_name: Option<char>,
        description: impl Into<String>,
        choices: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let choices = choices.into_iter().map(Into::into).collect();
        Self::new(FlagKind::Enum { choices }, long_name, short_name, description)
    }

    pub fn number(
        long_name: impl Into<String>,
        short_name: Option<char>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(FlagKind::Number, long_name, short_name, description)
    }

    pub fn string(
        long_name: impl Into<String>,
        short_name: Option<char>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(FlagKind::String, long_name, short_name, description)
    }

    /// Allow the flag to be left out.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn argument_type(&self) -> &'static str {
        self.kind.argument_type()
    }

    /// Validate a raw value. `None` means the flag was not supplied.
    pub fn parse(&self, raw: Option<&str>) -> Result<Option<FlagValue>, FlagError> {
        let Some(raw) = raw else {
            if self.optional {
                return Ok(None);
            }
            return Err(FlagError::Missing(self.long_name.clone()));
        };
        let value = raw.trim();
        let parsed = match &self.kind {
            FlagKind::Boolean => match value {
                "1" | "true" => FlagValue::Boolean(true),
                "0" | "false" => FlagValue::Boolean(false),
                _ => return Err(self.invalid()),
            },
            FlagKind::Enum { choices } => {
                if !choices.iter().any(|choice| choice == value) {
                    return Err(self.invalid());
                }
                FlagValue::String(value.to_string())
            }
            FlagKind::Number => match value.parse::<f64>() {
                Ok(number) if !number.is_nan() => FlagValue::Number(number),
                _ => return Err(self.invalid()),
            },
            FlagKind::String => FlagValue::String(value.to_string()),
        };
        Ok(Some(parsed))
    }

    fn invalid(&self) -> FlagError {
        FlagError::Invalid(self.long_name.clone())
    }
}

/// Flag values keyed by long name, in definition order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFlags {
    entries: Vec<(String, Option<FlagValue>)>,
}

impl ParsedFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` for `long_name`, replacing an earlier entry.
    pub fn insert(&mut self, long_name: impl Into<String>, value: Option<FlagValue>) {
        let long_name = long_name.into();
        match self.entries.iter_mut().find(|(name, _)| *name == long_name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((long_name, value)),
        }
    }

    pub fn get(&self, long_name: &str) -> Option<&FlagValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == long_name)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn bool(&self, long_name: &str) -> Option<bool> {
        self.get(long_name).and_then(FlagValue::as_bool)
    }

    pub fn number(&self, long_name: &str) -> Option<f64> {
        self.get(long_name).and_then(FlagValue::as_f64)
    }

    pub fn string(&self, long_name: &str) -> Option<&str> {
        self.get(long_name).and_then(FlagValue::as_str)
    }

    /// Supplied values only, in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.entries
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|value| (name.as_str(), value)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flags rendered as a re-runnable argument string: `--a '1' --b 'x'`.
    pub fn command_line(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("--{name} '{value}'"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Resolve every definition through `lookup`, trying the long name first and
/// then the short name.
pub fn parse_flags<F>(lookup: F, definitions: &[FlagDefinition]) -> Result<ParsedFlags, FlagError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut parsed = ParsedFlags::new();
    for flag in definitions {
        let raw = lookup(&flag.long_name).or_else(|| {
            flag.short_name
                .and_then(|short| lookup(short.encode_utf8(&mut [0; 4])))
        });
        parsed.insert(flag.long_name.clone(), flag.parse(raw.as_deref())?);
    }
    Ok(parsed)
}
