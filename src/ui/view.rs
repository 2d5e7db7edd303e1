//! The render contract every view implements, plus the plumbing a view uses
//! to ask its coordinator for a repaint.

use crate::error::UiError;
use crate::tui::prompt::Prompter;
use crate::tui::terminal::Terminal;
use crate::ui::session::Registry;
use async_trait::async_trait;
use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};

/// A self-contained unit of terminal output.
///
/// `render` starts with the cursor at column 0 of a fresh line and must end
/// the same way. The returned count is the number of rows written; the
/// coordinator relies on it to erase exactly those rows later.
#[async_trait]
pub trait View: Send + Sync {
    /// Draw the current state and return the number of lines written.
    fn render(&self, terminal: &mut dyn Terminal) -> io::Result<usize>;

    /// Whether [`View::initialize`] must run before the first render.
    fn should_initialize(&self) -> bool {
        false
    }

    /// One-time setup before the first render.
    ///
    /// Returns the number of lines the interaction left on screen; the caller
    /// erases them before painting the view.
    async fn initialize(&self, _prompter: &dyn Prompter) -> Result<usize, UiError> {
        Ok(0)
    }
}

struct Link {
    registry: Weak<Mutex<Registry>>,
    index: usize,
}

/// Non-owning back reference from a view to its coordinator.
///
/// A parent starts detached and is attached once, when the coordinator is
/// appended to the session. Repaint requests on a detached parent are
/// dropped; the view's state is still updated.
#[derive(Clone, Default)]
pub struct Parent {
    link: Arc<OnceLock<Link>>,
}

impl Parent {
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.link.get().is_some()
    }

    /// Registry index of the owning coordinator, once mounted.
    pub fn index(&self) -> Option<usize> {
        self.link.get().map(|link| link.index)
    }

    pub(crate) fn attach(&self, registry: Weak<Mutex<Registry>>, index: usize) {
        // A second attach would move the view; the first mount wins.
        let _ = self.link.set(Link { registry, index });
    }

    /// Ask the owning coordinator to repaint, cascading to views below it.
    pub fn request_rerender(&self) -> Result<(), UiError> {
        let Some(link) = self.link.get() else {
            return Ok(());
        };
        let Some(registry) = link.registry.upgrade() else {
            return Ok(());
        };
        let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
        registry.rerender(link.index)?;
        Ok(())
    }
}

impl fmt::Debug for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parent")
            .field("index", &self.index())
            .finish()
    }
}

/// Mutable view state paired with the view's parent link.
pub(crate) struct ViewCore<S> {
    state: Mutex<S>,
    parent: Parent,
}

impl<S> ViewCore<S> {
    pub(crate) fn new(state: S, parent: Parent) -> Self {
        Self {
            state: Mutex::new(state),
            parent,
        }
    }

    pub(crate) fn parent(&self) -> &Parent {
        &self.parent
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.lock())
    }

    /// Mutate state without requesting a repaint.
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.lock())
    }

    /// Merge a state change, then ask the parent to repaint.
    ///
    /// The state lock is released before the repaint starts, since rendering
    /// reads the state again.
    pub(crate) fn set_state(&self, f: impl FnOnce(&mut S)) -> Result<(), UiError> {
        self.update(f);
        self.parent.request_rerender()
    }

    fn lock(&self) -> MutexGuard<'_, S> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Number of terminal rows `text` occupies once a newline is appended.
pub(crate) fn line_count(text: &str) -> usize {
    text.split('\n').count()
}
