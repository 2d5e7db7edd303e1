//! Terminal primitives the view engine writes through.
//!
//! The engine never reads cursor position or screen size back from the
//! terminal. It only issues relative moves, column jumps, line erases and raw
//! text, and keeps its own line accounting.

use crossterm::cursor::{MoveDown, MoveLeft, MoveRight, MoveToColumn, MoveUp};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Write-only terminal capability used by views and coordinators.
pub trait Terminal: Send {
    /// Print raw text at the cursor. Newlines advance to column 0.
    fn write_text(&mut self, text: &str) -> io::Result<()>;
    /// Move the cursor relative to its position (positive rows go down).
    fn move_cursor(&mut self, d_col: i32, d_row: i32) -> io::Result<()>;
    /// Jump to an absolute column on the current row.
    fn set_column(&mut self, column: u16) -> io::Result<()>;
    /// Erase the entire row under the cursor.
    fn erase_line(&mut self) -> io::Result<()>;
    /// Push queued output to the device.
    fn flush(&mut self) -> io::Result<()>;
}

/// Terminal backed by crossterm commands queued on any writer.
pub struct CrosstermTerminal<W: Write + Send> {
    out: W,
}

impl CrosstermTerminal<io::Stdout> {
    /// Terminal writing to the process stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> CrosstermTerminal<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Terminal for CrosstermTerminal<W> {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.out.queue(Print(text))?;
        Ok(())
    }

    fn move_cursor(&mut self, d_col: i32, d_row: i32) -> io::Result<()> {
        if d_col > 0 {
            self.out.queue(MoveRight(clamp_steps(d_col)))?;
        } else if d_col < 0 {
            self.out.queue(MoveLeft(clamp_steps(d_col)))?;
        }
        if d_row > 0 {
            self.out.queue(MoveDown(clamp_steps(d_row)))?;
        } else if d_row < 0 {
            self.out.queue(MoveUp(clamp_steps(d_row)))?;
        }
        Ok(())
    }

    fn set_column(&mut self, column: u16) -> io::Result<()> {
        self.out.queue(MoveToColumn(column))?;
        Ok(())
    }

    fn erase_line(&mut self) -> io::Result<()> {
        self.out.queue(Clear(ClearType::CurrentLine))?;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

fn clamp_steps(delta: i32) -> u16 {
    delta.unsigned_abs().min(u32::from(u16::MAX)) as u16
}

/// One primitive operation issued against a [`BufferTerminal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalOp {
    Write(String),
    Move { d_col: i32, d_row: i32 },
    Column(u16),
    EraseLine,
    Flush,
}

/// In-memory terminal that records every operation.
///
/// Clones share the same log, so a caller can keep one handle for
/// inspection while the session owns another.
#[derive(Debug, Clone, Default)]
pub struct BufferTerminal {
    ops: Arc<Mutex<Vec<TerminalOp>>>,
}

impl BufferTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded operation, flushes included.
    pub fn ops(&self) -> Vec<TerminalOp> {
        self.ops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded operations without `Flush` markers.
    pub fn drawing_ops(&self) -> Vec<TerminalOp> {
        self.ops()
            .into_iter()
            .filter(|op| *op != TerminalOp::Flush)
            .collect()
    }

    /// Only the text payloads, in write order.
    pub fn writes(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                TerminalOp::Write(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Number of line erases recorded so far.
    pub fn erase_count(&self) -> usize {
        self.ops()
            .iter()
            .filter(|op| **op == TerminalOp::EraseLine)
            .count()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.ops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn push(&self, op: TerminalOp) {
        self.ops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(op);
    }
}

impl Terminal for BufferTerminal {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.push(TerminalOp::Write(text.to_string()));
        Ok(())
    }

    fn move_cursor(&mut self, d_col: i32, d_row: i32) -> io::Result<()> {
        self.push(TerminalOp::Move { d_col, d_row });
        Ok(())
    }

    fn set_column(&mut self, column: u16) -> io::Result<()> {
        self.push(TerminalOp::Column(column));
        Ok(())
    }

    fn erase_line(&mut self) -> io::Result<()> {
        self.push(TerminalOp::EraseLine);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.push(TerminalOp::Flush);
        Ok(())
    }
}
