//! Semantic colors for view output.
//!
//! Views never pick raw colors. They ask the [`Palette`] to paint a glyph
//! with a semantic [`ColorName`], which lets config override colors and lets
//! `--no-color` strip styling everywhere at once.

use crossterm::style::{Color, Stylize};
use std::collections::BTreeMap;

/// Semantic color used by view rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorName {
    Plain,
    Success,
    Warning,
    Error,
}

impl ColorName {
    /// Stable config key (used by `[display.colors]` overrides).
    pub fn key(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    fn all() -> [ColorName; 4] {
        [Self::Plain, Self::Success, Self::Warning, Self::Error]
    }
}

/// Resolved colors plus the global on/off switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
    plain: Color,
    success: Color,
    warning: Color,
    error: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            enabled: true,
            plain: rgb_color(255, 255, 255),
            success: rgb_color(44, 191, 78),
            warning: rgb_color(252, 127, 3),
            error: rgb_color(252, 3, 3),
        }
    }
}

impl Palette {
    /// Default colors, optionally disabled.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    /// Palette that never emits escape sequences.
    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Apply `name -> color` overrides; unknown names are skipped.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Result<Self, String> {
        for (key, value) in overrides {
            let normalized = key.trim().to_ascii_lowercase();
            let Some(name) = ColorName::all()
                .into_iter()
                .find(|name| name.key() == normalized)
            else {
                continue;
            };
            *self.slot(name) = parse_color(value)?;
        }
        Ok(self)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Resolve one semantic color.
    pub fn color(&self, name: ColorName) -> Color {
        match name {
            ColorName::Plain => self.plain,
            ColorName::Success => self.success,
            ColorName::Warning => self.warning,
            ColorName::Error => self.error,
        }
    }

    /// Style `text` with `name`, or return it untouched when disabled.
    pub fn paint(&self, name: ColorName, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        text.with(self.color(name)).to_string()
    }

    fn slot(&mut self, name: ColorName) -> &mut Color {
        match name {
            ColorName::Plain => &mut self.plain,
            ColorName::Success => &mut self.success,
            ColorName::Warning => &mut self.warning,
            ColorName::Error => &mut self.error,
        }
    }
}

fn parse_color(input: &str) -> Result<Color, String> {
    let normalized = input.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err("color value cannot be empty".to_string());
    }
    if let Some(hex) = normalized.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("invalid hex color `{input}` (expected #RRGGBB)"));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| format!("invalid hex color `{input}`"))
        };
        return Ok(rgb_color(channel(0..2)?, channel(2..4)?, channel(4..6)?));
    }

    let color = match normalized.as_str() {
        "white" => Color::White,
        "grey" | "gray" => Color::Grey,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        _ => return Err(format!("unsupported color value `{input}`")),
    };
    Ok(color)
}

fn rgb_color(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}
