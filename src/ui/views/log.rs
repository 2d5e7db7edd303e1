//! Plain text line(s) stacked in the session.

use crate::error::UiError;
use crate::tui::terminal::Terminal;
use crate::ui::view::{line_count, Parent, View, ViewCore};
use std::io;
use std::sync::Arc;

struct LogState {
    text: String,
}

struct LogInner {
    core: ViewCore<LogState>,
}

impl View for LogInner {
    fn render(&self, terminal: &mut dyn Terminal) -> io::Result<usize> {
        self.core.read(|state| {
            terminal.write_text(&format!("{}\n", state.text))?;
            Ok(line_count(&state.text))
        })
    }
}

/// Handle to a log view. Clones refer to the same on-screen region.
#[derive(Clone)]
pub struct LogView {
    inner: Arc<LogInner>,
}

impl LogView {
    pub(crate) fn new(parent: Parent, text: String) -> Self {
        Self {
            inner: Arc::new(LogInner {
                core: ViewCore::new(LogState { text }, parent),
            }),
        }
    }

    /// Log view that is not part of any session.
    pub fn detached(text: impl Into<String>) -> Self {
        Self::new(Parent::detached(), text.into())
    }

    pub fn text(&self) -> String {
        self.inner.core.read(|state| state.text.clone())
    }

    /// Replace the text and repaint this view and everything below it.
    pub fn set_text(&self, text: impl Into<String>) -> Result<(), UiError> {
        let text = text.into();
        self.inner.core.set_state(|state| state.text = text)
    }

    /// Draw the view directly, bypassing its coordinator.
    pub fn render(&self, terminal: &mut dyn Terminal) -> io::Result<usize> {
        self.inner.render(terminal)
    }

    pub fn parent(&self) -> &Parent {
        self.inner.core.parent()
    }

    pub(crate) fn as_view(&self) -> Arc<dyn View> {
        self.inner.clone()
    }
}

impl std::fmt::Debug for LogView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogView")
            .field("text", &self.text())
            .field("parent", self.parent())
            .finish()
    }
}
