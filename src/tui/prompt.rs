//! Single-question prompts that block until the user answers.
//!
//! The view engine treats prompting as an opaque capability: it hands over a
//! [`PromptRequest`], waits, and gets back a typed [`Answer`] together with
//! the number of terminal lines the prompt left on screen.

use crate::error::PromptError;
use crate::tui::settings;
use crate::ui::theme::{ColorName, Palette};
use async_trait::async_trait;
use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use std::fmt;
use std::io::{self, BufRead, IsTerminal, Write};
use std::ops::Range;
use std::time::Duration;

/// Kind of value a question produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Boolean,
    Enum,
    Number,
    Text,
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Boolean => "boolean",
            Self::Enum => "enum",
            Self::Number => "number",
            Self::Text => "string",
        })
    }
}

/// Everything a prompter needs to ask one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub kind: PromptKind,
    pub message: String,
    /// Selectable values; only meaningful for [`PromptKind::Enum`].
    pub choices: Vec<String>,
    /// Visible rows of an enum picker.
    pub page_size: usize,
}

impl PromptRequest {
    pub fn new(kind: PromptKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            choices: Vec::new(),
            page_size: settings::PROMPT_DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

/// Typed answer returned by a prompter.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Boolean(bool),
    Enum(String),
    Number(f64),
    Text(String),
}

impl Answer {
    pub fn kind(&self) -> PromptKind {
        match self {
            Self::Boolean(_) => PromptKind::Boolean,
            Self::Enum(_) => PromptKind::Enum,
            Self::Number(_) => PromptKind::Number,
            Self::Text(_) => PromptKind::Text,
        }
    }
}

/// Answer plus the on-screen residue of the interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptReply {
    pub answer: Answer,
    /// Lines the prompt printed that are still visible above the cursor.
    pub lines_printed: usize,
}

/// Asks one question and suspends until it is answered.
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn ask(&self, request: &PromptRequest) -> Result<PromptReply, PromptError>;
}

/// Prompter reading stdin and drawing on stdout.
#[derive(Debug, Clone, Copy)]
pub struct TerminalPrompter {
    palette: Palette,
}

impl TerminalPrompter {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn ask(&self, request: &PromptRequest) -> Result<PromptReply, PromptError> {
        let request = request.clone();
        let palette = self.palette;
        tokio::task::spawn_blocking(move || ask_blocking(&request, palette))
            .await
            .map_err(|e| PromptError::Io(io::Error::other(e)))?
    }
}

fn ask_blocking(request: &PromptRequest, palette: Palette) -> Result<PromptReply, PromptError> {
    let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();
    let marker = palette.paint(ColorName::Success, settings::GLYPH_QUESTION);
    match request.kind {
        PromptKind::Boolean => {
            let header = format!(
                "{marker} {} {} ",
                request.message,
                settings::PROMPT_BOOLEAN_HINT
            );
            let (raw, lines) = read_answer_line(&header, interactive)?;
            let yes = matches!(raw.trim().to_ascii_lowercase().as_str(), "y" | "yes");
            Ok(PromptReply {
                answer: Answer::Boolean(yes),
                lines_printed: lines,
            })
        }
        PromptKind::Text => {
            let header = format!("{marker} {} ", request.message);
            let (raw, lines) = read_answer_line(&header, interactive)?;
            Ok(PromptReply {
                answer: Answer::Text(raw),
                lines_printed: lines,
            })
        }
        PromptKind::Number => {
            let header = format!("{marker} {} ", request.message);
            let mut lines_printed = 0;
            loop {
                let (raw, lines) = read_answer_line(&header, interactive)?;
                lines_printed += lines;
                match parse_number(&raw) {
                    Some(value) => {
                        return Ok(PromptReply {
                            answer: Answer::Number(value),
                            lines_printed,
                        })
                    }
                    None => {
                        let mut out = io::stdout();
                        writeln!(
                            out,
                            "{}",
                            palette.paint(ColorName::Error, settings::PROMPT_NUMBER_RETRY)
                        )?;
                        out.flush()?;
                        lines_printed += 1;
                    }
                }
            }
        }
        PromptKind::Enum if interactive => pick_interactive(request, palette, &marker),
        PromptKind::Enum => pick_fallback(request, &marker),
    }
}

/// Print `header`, read one line, and report how many rows it occupied.
fn read_answer_line(header: &str, interactive: bool) -> Result<(String, usize), PromptError> {
    let mut out = io::stdout();
    write!(out, "{header}")?;
    out.flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        writeln!(out)?;
        out.flush()?;
        return Err(PromptError::Cancelled);
    }
    let answer = line.trim_end_matches(&['\r', '\n'][..]).to_string();
    if !interactive {
        // Piped input is not echoed, so finish the row ourselves.
        writeln!(out, "{answer}")?;
        out.flush()?;
    }
    let width = visible_width(header) + answer.chars().count();
    Ok((answer, rows_for(width, terminal_columns())))
}

fn pick_fallback(request: &PromptRequest, marker: &str) -> Result<PromptReply, PromptError> {
    let mut out = io::stdout();
    writeln!(out, "{marker} {}", request.message)?;
    for (idx, choice) in request.choices.iter().enumerate() {
        writeln!(out, "  {}. {}", idx + 1, choice)?;
    }
    let (raw, lines) = read_answer_line(settings::PROMPT_FALLBACK_PICK, false)?;
    let choice = raw
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| request.choices.get(idx))
        .or_else(|| request.choices.iter().find(|c| c.as_str() == raw.trim()))
        .cloned()
        .ok_or(PromptError::Cancelled)?;
    Ok(PromptReply {
        answer: Answer::Enum(choice),
        lines_printed: 1 + request.choices.len() + lines,
    })
}

/// Arrow-key picker drawn in raw mode; collapses to one summary row.
fn pick_interactive(
    request: &PromptRequest,
    palette: Palette,
    marker: &str,
) -> Result<PromptReply, PromptError> {
    if request.choices.is_empty() {
        return Err(PromptError::Cancelled);
    }
    let mut out = io::stdout();
    let mut selected = 0usize;
    let mut previous_rows = 0usize;
    let outcome = {
        let _guard = RawModeGuard::acquire()?;
        previous_rows = draw_picker(&mut out, request, palette, marker, selected, previous_rows)?;
        loop {
            if !event::poll(Duration::from_millis(settings::PROMPT_EVENT_POLL_MS))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
                continue;
            }
            match picker_step(key, selected, request.choices.len()) {
                PickerStep::Move(next) if next != selected => {
                    selected = next;
                    previous_rows =
                        draw_picker(&mut out, request, palette, marker, selected, previous_rows)?;
                }
                PickerStep::Move(_) | PickerStep::Ignore => {}
                PickerStep::Accept => break Ok(selected),
                PickerStep::Cancel => break Err(PromptError::Cancelled),
            }
        }
    };

    clear_surface(&mut out, previous_rows)?;
    let index = outcome?;
    let choice = request.choices[index].clone();
    write!(out, "{marker} {}: {choice}\r\n", request.message)?;
    out.flush()?;
    Ok(PromptReply {
        answer: Answer::Enum(choice),
        lines_printed: 1,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickerStep {
    Move(usize),
    Accept,
    Cancel,
    Ignore,
}

/// Map a key press onto the picker; the selection wraps at both ends.
fn picker_step(key: KeyEvent, selected: usize, len: usize) -> PickerStep {
    match key.code {
        KeyCode::Up => PickerStep::Move(selected.checked_sub(1).unwrap_or(len - 1)),
        KeyCode::Down => PickerStep::Move((selected + 1) % len),
        KeyCode::Enter => PickerStep::Accept,
        KeyCode::Esc => PickerStep::Cancel,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => PickerStep::Cancel,
        _ => PickerStep::Ignore,
    }
}

/// Draw title, help and the visible page; return the cursor row offset.
fn draw_picker<W: Write>(
    out: &mut W,
    request: &PromptRequest,
    palette: Palette,
    marker: &str,
    selected: usize,
    previous_rows: usize,
) -> io::Result<usize> {
    if previous_rows > 0 {
        out.queue(MoveUp(previous_rows as u16))?;
    }
    out.queue(MoveToColumn(0))?;
    out.queue(Clear(ClearType::FromCursorDown))?;
    out.queue(Print(format!(
        "{marker} {} {}",
        request.message,
        palette.paint(ColorName::Plain, settings::PROMPT_PICKER_HELP)
    )))?;

    let window = page_window(selected, request.choices.len(), request.page_size);
    let rows = window.len();
    for idx in window {
        let row = if idx == selected {
            palette.paint(
                ColorName::Warning,
                &format!("{} {}", settings::PROMPT_PICKER_SELECTED, request.choices[idx]),
            )
        } else {
            format!(
                "{} {}",
                settings::PROMPT_PICKER_UNSELECTED,
                request.choices[idx]
            )
        };
        out.queue(Print("\r\n"))?;
        out.queue(Print(format!("  {row}")))?;
    }
    out.flush()?;
    Ok(rows)
}

fn clear_surface<W: Write>(out: &mut W, previous_rows: usize) -> io::Result<()> {
    if previous_rows > 0 {
        out.queue(MoveUp(previous_rows as u16))?;
    }
    out.queue(MoveToColumn(0))?;
    out.queue(Clear(ClearType::FromCursorDown))?;
    out.flush()
}

/// Slice of choice indexes visible for the current selection.
fn page_window(selected: usize, len: usize, page_size: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    if len <= page_size {
        return 0..len;
    }
    let start = selected
        .saturating_sub(page_size / 2)
        .min(len - page_size);
    start..start + page_size
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| !value.is_nan())
}

/// Width of `text` ignoring ANSI escape sequences.
fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in text.chars() {
        match (in_escape, c) {
            (false, '\x1b') => in_escape = true,
            (true, c) if c.is_ascii_alphabetic() => in_escape = false,
            (true, _) => {}
            (false, _) => width += 1,
        }
    }
    width
}

fn rows_for(width: usize, cols: usize) -> usize {
    if cols == 0 || width == 0 {
        return 1;
    }
    width.div_ceil(cols)
}

fn terminal_columns() -> usize {
    terminal::size()
        .ok()
        .map(|(cols, _)| cols as usize)
        .filter(|cols| *cols > 0)
        .unwrap_or(80)
}

struct RawModeGuard;

impl RawModeGuard {
    /// Enable raw mode and restore cooked mode on drop.
    fn acquire() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
