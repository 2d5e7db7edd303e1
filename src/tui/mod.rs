//! Terminal building blocks.
//!
//! Cursor and erase primitives, the blocking prompt, the spinner timer and
//! the shared glyph settings. Nothing here knows about views.

pub mod prompt;
pub mod settings;
pub mod spinner;
pub mod terminal;

pub use prompt::{Answer, PromptKind, PromptReply, PromptRequest, Prompter, TerminalPrompter};
pub use terminal::{BufferTerminal, CrosstermTerminal, Terminal, TerminalOp};
