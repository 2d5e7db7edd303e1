//! Headless fixtures shared by the integration suites.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use strata::error::PromptError;
use strata::tui::{Answer, PromptReply, PromptRequest, Prompter};
use strata::tui::{BufferTerminal, TerminalOp};
use strata::ui::session::{Session, SessionOptions};
use strata::ui::theme::Palette;
use tokio::sync::Notify;

/// Answers from a fixed script; cancels once the script is exhausted.
///
/// With a gate installed, each question waits for [`Script::release`] before
/// answering, which lets a test act while the prompt owns the terminal.
#[derive(Clone, Default)]
pub struct Script {
    answers: Arc<Mutex<VecDeque<Answer>>>,
    asked: Arc<Mutex<Vec<PromptRequest>>>,
    gate: Option<Arc<Notify>>,
    residue: usize,
}

impl Script {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().collect())),
            ..Self::default()
        }
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    pub fn with_residue(mut self, lines: usize) -> Self {
        self.residue = lines;
        self
    }

    /// Let the pending (or next) gated question answer.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn requests(&self) -> Vec<PromptRequest> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prompter for Script {
    async fn ask(&self, request: &PromptRequest) -> Result<PromptReply, PromptError> {
        self.asked.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let answer = self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(PromptError::Cancelled)?;
        Ok(PromptReply {
            answer,
            lines_printed: self.residue,
        })
    }
}

pub fn session_with(script: Script, palette: Palette) -> (Session, BufferTerminal) {
    let term = BufferTerminal::new();
    let options = SessionOptions {
        palette,
        ..SessionOptions::default()
    };
    (Session::new(term.clone(), script, options), term)
}

pub fn plain_session(script: Script) -> (Session, BufferTerminal) {
    session_with(script, Palette::plain())
}

/// Replays recorded terminal operations onto a grid of rows.
///
/// Only what the engine emits is modelled: text with newlines, relative and
/// column moves, and whole-line erases.
#[derive(Debug, Default)]
pub struct Screen {
    rows: Vec<String>,
    row: usize,
    col: usize,
}

impl Screen {
    pub fn replay(ops: &[TerminalOp]) -> Self {
        let mut screen = Self::default();
        for op in ops {
            screen.apply(op);
        }
        screen
    }

    fn apply(&mut self, op: &TerminalOp) {
        match op {
            TerminalOp::Write(text) => {
                for (i, part) in text.split('\n').enumerate() {
                    if i > 0 {
                        self.row += 1;
                        self.col = 0;
                    }
                    self.put(part);
                }
            }
            TerminalOp::Move { d_col, d_row } => {
                self.row = (self.row as i64 + i64::from(*d_row)).max(0) as usize;
                self.col = (self.col as i64 + i64::from(*d_col)).max(0) as usize;
            }
            TerminalOp::Column(col) => self.col = usize::from(*col),
            TerminalOp::EraseLine => {
                self.ensure_row();
                self.rows[self.row].clear();
            }
            TerminalOp::Flush => {}
        }
    }

    fn ensure_row(&mut self) {
        while self.rows.len() <= self.row {
            self.rows.push(String::new());
        }
    }

    fn put(&mut self, text: &str) {
        self.ensure_row();
        let line = &mut self.rows[self.row];
        let mut chars: Vec<char> = line.chars().collect();
        while chars.len() < self.col {
            chars.push(' ');
        }
        chars.truncate(self.col);
        chars.extend(text.chars());
        *line = chars.into_iter().collect();
        self.col += text.chars().count();
    }

    /// Non-empty rows from the top, trailing blank rows dropped.
    pub fn lines(&self) -> Vec<String> {
        let mut rows = self.rows.clone();
        while rows.last().is_some_and(String::is_empty) {
            rows.pop();
        }
        rows
    }

    pub fn cursor_row(&self) -> usize {
        self.row
    }
}
