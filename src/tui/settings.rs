//! Centralized, hardcoded glyphs and timings for the view engine.
//!
//! This is the single place to tweak spinner frames, status glyphs and
//! prompt chrome.

// ---------------------------------------------------------------------------
// Spinner
// ---------------------------------------------------------------------------

/// Frames cycled by a running task, in order.
pub const SPINNER_FRAMES: [&str; 4] = ["\u{2013}", "\\", "|", "/"];
/// Default delay between two spinner frames.
pub const SPINNER_TICK_MS: u64 = 150;

// ---------------------------------------------------------------------------
// Status glyphs
// ---------------------------------------------------------------------------

pub const GLYPH_COMPLETED: &str = "\u{203B}";
pub const GLYPH_FAILED: &str = "!";
pub const GLYPH_QUESTION: &str = "?";

// ---------------------------------------------------------------------------
// Question rendering
// ---------------------------------------------------------------------------

pub const ANSWER_YES: &str = "Yes";
pub const ANSWER_NO: &str = "No";
pub const ANSWER_SEPARATOR: &str = ": ";

// ---------------------------------------------------------------------------
// Prompt chrome
// ---------------------------------------------------------------------------

pub const PROMPT_BOOLEAN_HINT: &str = "(y/N)";
pub const PROMPT_PICKER_HELP: &str = "(use arrow keys, enter to select)";
pub const PROMPT_PICKER_SELECTED: &str = "\u{276F}";
pub const PROMPT_PICKER_UNSELECTED: &str = " ";
pub const PROMPT_FALLBACK_PICK: &str = "  pick a number: ";
pub const PROMPT_NUMBER_RETRY: &str = "  please enter a number";
pub const PROMPT_DEFAULT_PAGE_SIZE: usize = 5;
pub const PROMPT_EVENT_POLL_MS: u64 = 80;
