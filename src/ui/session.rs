//! The stack of on-screen views and the facade that creates them.
//!
//! A [`Session`] owns an ordered registry of [`RootCoordinator`]s. Index is
//! creation order and vertical position: index 0 is the topmost view. When
//! the view at index `i` repaints, every coordinator below it is erased from
//! the bottom up, `i` is redrawn, and the lower ones are redrawn top down.
//!
//! While a question prompt owns the terminal, repaint requests are merged
//! into state immediately but the cascade is held back until the prompt's
//! residue has been erased.

use crate::config::Config;
use crate::error::{ConfigError, UiError};
use crate::tui::prompt::{Prompter, TerminalPrompter};
use crate::tui::settings::{PROMPT_DEFAULT_PAGE_SIZE, SPINNER_TICK_MS};
use crate::tui::terminal::{CrosstermTerminal, Terminal};
use crate::ui::root::{RerenderEvent, RootCoordinator};
use crate::ui::theme::Palette;
use crate::ui::view::Parent;
use crate::ui::views::question::{Boolean, Enum, Number, QuestionKind, Text};
use crate::ui::views::{
    BooleanQuestion, EnumQuestion, LogView, NumberQuestion, QuestionOptions, QuestionProps,
    QuestionView, StringQuestion, TaskOptions, TaskProps, TaskView,
};
use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

/// Ordered coordinators plus the terminal they draw on.
pub(crate) struct Registry {
    terminal: Box<dyn Terminal>,
    roots: Vec<RootCoordinator>,
    /// Number of prompts currently holding the terminal.
    prompting: usize,
    /// Lowest index whose repaint was held back by a prompt.
    deferred: Option<usize>,
}

impl Registry {
    fn new(terminal: Box<dyn Terminal>) -> Self {
        Self {
            terminal,
            roots: Vec::new(),
            prompting: 0,
            deferred: None,
        }
    }

    /// Repaint the coordinator at `index` and cascade to everything below.
    pub(crate) fn rerender(&mut self, index: usize) -> io::Result<()> {
        if index >= self.roots.len() {
            return Ok(());
        }
        if self.prompting > 0 {
            self.defer(index);
            return Ok(());
        }

        let (upper, lower) = self.roots.split_at_mut(index + 1);
        debug!(index, below = lower.len(), "cascade");
        upper[index].request_rerender(self.terminal.as_mut(), |event, terminal| {
            match event {
                RerenderEvent::Before => {
                    for root in lower.iter_mut().rev() {
                        root.reset(&mut *terminal)?;
                    }
                }
                RerenderEvent::After => {
                    for root in lower.iter_mut() {
                        root.render(&mut *terminal)?;
                    }
                }
            }
            Ok(())
        })?;
        self.terminal.flush()
    }

    fn defer(&mut self, index: usize) {
        self.deferred = Some(self.deferred.map_or(index, |pending| pending.min(index)));
    }

    /// Draw `root` below everything else and record it. Returns its index.
    fn mount(&mut self, mut root: RootCoordinator) -> io::Result<usize> {
        let index = self.roots.len();
        if self.prompting > 0 {
            self.roots.push(root);
            self.defer(index);
            return Ok(index);
        }
        root.render(self.terminal.as_mut())?;
        self.roots.push(root);
        self.terminal.flush()?;
        Ok(index)
    }

    fn begin_prompt(&mut self) {
        self.prompting += 1;
    }

    /// Hand the terminal back after a prompt and erase its `residue` lines.
    fn end_prompt(&mut self, residue: usize) -> io::Result<()> {
        self.prompting = self.prompting.saturating_sub(1);
        if residue > 0 {
            self.terminal.set_column(0)?;
            for _ in 0..residue {
                self.terminal.move_cursor(0, -1)?;
                self.terminal.erase_line()?;
            }
        }
        if self.prompting == 0 {
            if let Some(index) = self.deferred.take() {
                debug!(index, "running deferred cascade");
                self.rerender(index)?;
            }
        }
        self.terminal.flush()
    }
}

/// Defaults applied to views created by a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    pub palette: Palette,
    pub spinner_interval: Duration,
    /// Enum picker rows when a question does not set its own.
    pub page_size: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            spinner_interval: Duration::from_millis(SPINNER_TICK_MS),
            page_size: PROMPT_DEFAULT_PAGE_SIZE,
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let palette = Palette::new(config.display.color)
            .with_overrides(&config.display.colors)
            .map_err(|e| ConfigError::Invalid(format!("display.colors: {e}")))?;
        Ok(Self {
            palette,
            spinner_interval: Duration::from_millis(config.display.spinner_interval_ms),
            page_size: config.prompt.page_size,
        })
    }
}

/// Entry point for stacking views on a terminal.
///
/// Clones share the same registry, so a session can be handed to several
/// tasks; cascades never interleave.
#[derive(Clone)]
pub struct Session {
    registry: Arc<Mutex<Registry>>,
    prompter: Arc<dyn Prompter>,
    options: SessionOptions,
}

impl Session {
    pub fn new(
        terminal: impl Terminal + 'static,
        prompter: impl Prompter + 'static,
        options: SessionOptions,
    ) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::new(Box::new(terminal)))),
            prompter: Arc::new(prompter),
            options,
        }
    }

    /// Session drawing on stdout and prompting on stdin.
    pub fn stdout(options: SessionOptions) -> Self {
        Self::new(
            CrosstermTerminal::stdout(),
            TerminalPrompter::new(options.palette),
            options,
        )
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Number of views on screen.
    pub fn len(&self) -> usize {
        self.lock().roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a log view showing `text`.
    pub fn log(&self, text: impl fmt::Display) -> Result<LogView, UiError> {
        let parent = Parent::detached();
        let view = LogView::new(parent.clone(), text.to_string());
        self.mount(RootCoordinator::new(view.as_view()), &parent)?;
        Ok(view)
    }

    /// Append a task indicator, running unless `options` say otherwise.
    pub fn task(
        &self,
        props: impl Into<TaskProps>,
        options: TaskOptions,
    ) -> Result<TaskView, UiError> {
        let parent = Parent::detached();
        let view = TaskView::new(
            parent.clone(),
            props.into(),
            options,
            self.options.palette,
            self.options.spinner_interval,
        );
        self.mount(RootCoordinator::new(view.as_view()), &parent)?;
        Ok(view)
    }

    pub async fn ask_boolean(
        &self,
        props: impl Into<QuestionProps>,
        options: QuestionOptions,
    ) -> Result<BooleanQuestion, UiError> {
        self.ask::<Boolean>(props.into(), options).await
    }

    pub async fn ask_enum(
        &self,
        props: QuestionProps,
        options: QuestionOptions,
    ) -> Result<EnumQuestion, UiError> {
        self.ask::<Enum>(props, options).await
    }

    pub async fn ask_number(
        &self,
        props: impl Into<QuestionProps>,
        options: QuestionOptions,
    ) -> Result<NumberQuestion, UiError> {
        self.ask::<Number>(props.into(), options).await
    }

    pub async fn ask_string(
        &self,
        props: impl Into<QuestionProps>,
        options: QuestionOptions,
    ) -> Result<StringQuestion, UiError> {
        self.ask::<Text>(props.into(), options).await
    }

    async fn ask<K: QuestionKind>(
        &self,
        props: QuestionProps,
        options: QuestionOptions,
    ) -> Result<QuestionView<K>, UiError> {
        let parent = Parent::detached();
        let view = QuestionView::<K>::new(parent.clone(), props, options, self.options.page_size);
        let root = RootCoordinator::new(view.as_view());

        self.lock().begin_prompt();
        let answered = root.initialize(self.prompter.as_ref()).await;
        {
            let mut registry = self.lock();
            let residue = answered.as_ref().map_or(0, |lines| *lines);
            registry.end_prompt(residue)?;
        }
        answered?;

        self.mount(root, &parent)?;
        Ok(view)
    }

    fn mount(&self, root: RootCoordinator, parent: &Parent) -> Result<usize, UiError> {
        let mut registry = self.lock();
        let index = registry.mount(root)?;
        parent.attach(Arc::downgrade(&self.registry), index);
        debug!(index, "view mounted");
        Ok(index)
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("views", &self.len())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{plain_session, ScriptedPrompter};
    use crate::tui::prompt::Answer;
    use crate::tui::terminal::TerminalOp;
    use pretty_assertions::assert_eq;

    #[test]
    fn views_stack_in_creation_order() {
        let (session, term) = plain_session(ScriptedPrompter::empty());
        session.log("first").unwrap();
        session.log("second").unwrap();
        assert_eq!(session.len(), 2);
        assert_eq!(
            term.writes(),
            vec!["first\n".to_string(), "second\n".to_string()]
        );
    }

    #[test]
    fn changing_a_log_redraws_views_below_it() {
        // Lower views are erased bottom-up and redrawn top-down.
        let (session, term) = plain_session(ScriptedPrompter::empty());
        let top = session.log("top").unwrap();
        session.log("middle").unwrap();
        session.log("bottom").unwrap();
        term.clear();

        top.set_text("top\ngrew").unwrap();

        let up_erase = [
            TerminalOp::Move { d_col: 0, d_row: -1 },
            TerminalOp::EraseLine,
        ];
        let mut expected = Vec::new();
        // bottom, then middle, then top itself
        for _ in 0..3 {
            expected.push(TerminalOp::Column(0));
            expected.extend(up_erase.iter().cloned());
        }
        expected.push(TerminalOp::Write("top\ngrew\n".into()));
        expected.push(TerminalOp::Write("middle\n".into()));
        expected.push(TerminalOp::Write("bottom\n".into()));
        assert_eq!(term.drawing_ops(), expected);
    }

    #[test]
    fn repaint_of_last_view_touches_nothing_above() {
        let (session, term) = plain_session(ScriptedPrompter::empty());
        session.log("above").unwrap();
        let last = session.log("last").unwrap();
        term.clear();

        last.set_text("changed").unwrap();
        assert_eq!(term.writes(), vec!["changed\n".to_string()]);
        assert_eq!(term.erase_count(), 1);
    }

    #[tokio::test]
    async fn prompt_residue_is_erased_before_the_answer_is_drawn() {
        let prompter = ScriptedPrompter::new([Answer::Text("Ada".into())]).with_residue(2);
        let (session, term) = plain_session(prompter);
        let name = session
            .ask_string("Name", QuestionOptions::default())
            .await
            .unwrap();

        assert_eq!(name.value().as_deref(), Some("Ada"));
        assert_eq!(
            term.drawing_ops(),
            vec![
                TerminalOp::Column(0),
                TerminalOp::Move { d_col: 0, d_row: -1 },
                TerminalOp::EraseLine,
                TerminalOp::Move { d_col: 0, d_row: -1 },
                TerminalOp::EraseLine,
                TerminalOp::Write("Name: Ada\n".into()),
            ]
        );
    }

    #[tokio::test]
    async fn failed_prompt_mounts_nothing() {
        let (session, term) = plain_session(ScriptedPrompter::empty());
        let err = session
            .ask_boolean("Continue", QuestionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, UiError::Prompt(_)));
        assert!(session.is_empty());
        assert!(term.writes().is_empty());

        // The terminal is usable again afterwards.
        session.log("after").unwrap();
        assert_eq!(term.writes(), vec!["after\n".to_string()]);
    }

    #[test]
    fn options_follow_config() {
        let mut config = Config::default();
        config.display.color = false;
        config.display.spinner_interval_ms = 40;
        config.prompt.page_size = 9;
        let options = SessionOptions::from_config(&config).unwrap();
        assert!(!options.palette.is_enabled());
        assert_eq!(options.spinner_interval, Duration::from_millis(40));
        assert_eq!(options.page_size, 9);
    }
}
