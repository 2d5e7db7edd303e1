//! Single-line task indicator with an animated spinner while running.

use crate::error::UiError;
use crate::tui::settings::{GLYPH_COMPLETED, GLYPH_FAILED, SPINNER_FRAMES, SPINNER_TICK_MS};
use crate::tui::spinner::SpinnerHandle;
use crate::tui::terminal::Terminal;
use crate::ui::theme::{ColorName, Palette};
use crate::ui::view::{line_count, Parent, View, ViewCore};
use std::fmt;
use std::io;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Lifecycle of a task indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TaskStatus {
    #[default]
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown task status `{other}`")),
        }
    }
}

/// Caller-supplied content of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskProps {
    pub text: String,
}

impl From<&str> for TaskProps {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl From<String> for TaskProps {
    fn from(text: String) -> Self {
        Self { text }
    }
}

/// Construction options for a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskOptions {
    /// Initial status; `Running` when absent.
    pub status: Option<TaskStatus>,
}

impl TaskOptions {
    pub fn with_status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
        }
    }
}

struct TaskState {
    text: String,
    status: TaskStatus,
    frame: usize,
}

struct TaskInner {
    core: ViewCore<TaskState>,
    palette: Palette,
    period: Duration,
    spinner: Mutex<Option<SpinnerHandle>>,
}

impl TaskInner {
    /// Advance the spinner one frame. Returns `false` once the task has left
    /// `Running`, which stops the timer.
    fn tick(&self) -> bool {
        let advanced = self.core.update(|state| {
            if state.status != TaskStatus::Running {
                return false;
            }
            state.frame = (state.frame + 1) % SPINNER_FRAMES.len();
            trace!(frame = state.frame, "spinner tick");
            true
        });
        if advanced {
            if let Err(err) = self.core.parent().request_rerender() {
                warn!(error = %err, "spinner repaint failed");
            }
        }
        advanced
    }

    fn spinner_slot(&self) -> std::sync::MutexGuard<'_, Option<SpinnerHandle>> {
        self.spinner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stop_spinner(&self) {
        if let Some(mut handle) = self.spinner_slot().take() {
            handle.finish();
            debug!("spinner stopped");
        }
    }
}

fn start_spinner(inner: &Arc<TaskInner>) {
    let weak: Weak<TaskInner> = Arc::downgrade(inner);
    let handle = SpinnerHandle::spawn(inner.period, move || {
        weak.upgrade().is_some_and(|task| task.tick())
    });
    match handle {
        Some(handle) => {
            debug!(period_ms = inner.period.as_millis() as u64, "spinner started");
            if let Some(mut previous) = inner.spinner_slot().replace(handle) {
                previous.finish();
            }
        }
        None => warn!("no async runtime available; task spinner stays on its current frame"),
    }
}

impl View for TaskInner {
    fn render(&self, terminal: &mut dyn Terminal) -> io::Result<usize> {
        self.core.read(|state| {
            let (color, glyph) = match state.status {
                TaskStatus::Running => (ColorName::Warning, SPINNER_FRAMES[state.frame]),
                TaskStatus::Completed => (ColorName::Success, GLYPH_COMPLETED),
                TaskStatus::Failed => (ColorName::Error, GLYPH_FAILED),
            };
            let glyph = self.palette.paint(color, glyph);
            terminal.write_text(&format!("{glyph} {}\n", state.text))?;
            Ok(line_count(&state.text))
        })
    }
}

/// Handle to a task indicator. Clones refer to the same task.
#[derive(Clone)]
pub struct TaskView {
    inner: Arc<TaskInner>,
}

impl TaskView {
    pub(crate) fn new(
        parent: Parent,
        props: TaskProps,
        options: TaskOptions,
        palette: Palette,
        period: Duration,
    ) -> Self {
        let status = options.status.unwrap_or_default();
        let inner = Arc::new(TaskInner {
            core: ViewCore::new(
                TaskState {
                    text: props.text,
                    status,
                    frame: 0,
                },
                parent,
            ),
            palette,
            period,
            spinner: Mutex::new(None),
        });
        if status == TaskStatus::Running {
            start_spinner(&inner);
        }
        Self { inner }
    }

    /// Task view that is not part of any session.
    pub fn detached(props: impl Into<TaskProps>, options: TaskOptions, palette: Palette) -> Self {
        Self::new(
            Parent::detached(),
            props.into(),
            options,
            palette,
            Duration::from_millis(SPINNER_TICK_MS),
        )
    }

    pub fn status(&self) -> TaskStatus {
        self.inner.core.read(|state| state.status)
    }

    pub fn text(&self) -> String {
        self.inner.core.read(|state| state.text.clone())
    }

    /// Current spinner frame index.
    pub fn frame(&self) -> usize {
        self.inner.core.read(|state| state.frame)
    }

    /// Whether a spinner timer is currently scheduled.
    pub fn is_animating(&self) -> bool {
        self.inner
            .spinner_slot()
            .as_ref()
            .is_some_and(SpinnerHandle::is_active)
    }

    pub fn set_text(&self, text: impl Into<String>) -> Result<(), UiError> {
        let text = text.into();
        self.inner.core.set_state(|state| state.text = text)
    }

    /// Move the task to `next`.
    ///
    /// Setting the current status does nothing. Leaving `Running` cancels the
    /// spinner before the repaint and rewinds it to the first frame; entering
    /// `Running` schedules it again.
    pub fn set_status(&self, next: TaskStatus) -> Result<(), UiError> {
        let previous = self.inner.core.update(|state| {
            let previous = state.status;
            if previous != next {
                state.status = next;
                if next != TaskStatus::Running {
                    state.frame = 0;
                }
            }
            previous
        });
        if previous == next {
            return Ok(());
        }
        debug!(from = %previous, to = %next, "task status changed");

        if next == TaskStatus::Running {
            start_spinner(&self.inner);
        } else if previous == TaskStatus::Running {
            self.inner.stop_spinner();
        }
        self.inner.core.parent().request_rerender()
    }

    /// Draw the task directly, bypassing its coordinator.
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

impl fmt::Debug for TaskView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskView")
            .field("text", &self.text())
            .field("status", &self.status())
            .field("frame", &self.frame())
            .finish()
    }
}
