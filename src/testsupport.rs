//! Shared test fixtures for view, session, flag and config tests.
//!
//! Tests drive sessions headlessly: a [`BufferTerminal`] records every
//! terminal operation and a [`ScriptedPrompter`] answers questions from a
//! fixed script.

use crate::error::PromptError;
use crate::tui::prompt::{Answer, PromptReply, PromptRequest, Prompter};
use crate::tui::terminal::BufferTerminal;
use crate::ui::session::{Session, SessionOptions};
use crate::ui::theme::Palette;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!("strata-{prefix}-{millis}-{suffix}"));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Prompter that replays canned answers and records what it was asked.
///
/// Once the script runs out every question is reported as cancelled.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: Arc<Mutex<VecDeque<Answer>>>,
    asked: Arc<Mutex<Vec<PromptRequest>>>,
    residue: usize,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().collect())),
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Lines each answer pretends to leave on screen.
    pub fn with_residue(mut self, lines: usize) -> Self {
        self.residue = lines;
        self
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<PromptRequest> {
        self.asked.lock().expect("prompter log poisoned").clone()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn ask(&self, request: &PromptRequest) -> Result<PromptReply, PromptError> {
        self.asked
            .lock()
            .expect("prompter log poisoned")
            .push(request.clone());
        let answer = self
            .answers
            .lock()
            .expect("prompter script poisoned")
            .pop_front()
            .ok_or(PromptError::Cancelled)?;
        Ok(PromptReply {
            answer,
            lines_printed: self.residue,
        })
    }
}

/// Colorless session on a recording terminal; returns the inspection handle.
pub fn plain_session(prompter: ScriptedPrompter) -> (Session, BufferTerminal) {
    let term = BufferTerminal::new();
    let options = SessionOptions {
        palette: Palette::plain(),
        ..SessionOptions::default()
    };
    (Session::new(term.clone(), prompter, options), term)
}
