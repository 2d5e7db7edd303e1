//! Per-view owner of the render/erase contract.

use crate::error::UiError;
use crate::tui::prompt::Prompter;
use crate::tui::terminal::Terminal;
use crate::ui::view::View;
use std::fmt;
use std::io;
use std::sync::Arc;

/// Phase of a repaint, reported to whoever coordinates sibling regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RerenderEvent {
    /// The child is about to repaint; nothing of it has been erased yet.
    Before,
    /// The child has been repainted.
    After,
}

/// Owns one top-level view and remembers how many rows it occupies.
///
/// The coordinator knows nothing about its siblings. Callers that stack
/// several coordinators hook [`RerenderEvent`]s to erase and redraw the
/// regions below it.
pub struct RootCoordinator {
    child: Option<Arc<dyn View>>,
    last_line_count: usize,
    offset: usize,
}

impl RootCoordinator {
    pub fn new(child: Arc<dyn View>) -> Self {
        Self {
            child: Some(child),
            last_line_count: 0,
            offset: 0,
        }
    }

    /// Coordinator with nothing to draw.
    pub fn empty() -> Self {
        Self {
            child: None,
            last_line_count: 0,
            offset: 0,
        }
    }

    /// Rows the child sits below this coordinator's top line.
    pub fn set_child_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Rows written by the most recent render.
    pub fn line_count(&self) -> usize {
        self.last_line_count
    }

    /// Draw the child and record its height.
    pub fn render(&mut self, terminal: &mut dyn Terminal) -> io::Result<usize> {
        let lines = match &self.child {
            Some(child) => child.render(terminal)?,
            None => 0,
        };
        if self.offset > 0 {
            terminal.move_cursor(0, to_rows(self.offset))?;
        }
        self.last_line_count = lines;
        Ok(lines)
    }

    /// Erase the rows of the last render, ending on the child's top line.
    ///
    /// Assumes the cursor sits where the last render left it.
    pub fn reset(&mut self, terminal: &mut dyn Terminal) -> io::Result<()> {
        if self.last_line_count == 0 {
            return Ok(());
        }
        terminal.set_column(0)?;
        if self.offset > 0 {
            terminal.move_cursor(0, -to_rows(self.offset))?;
        }
        for _ in 0..self.last_line_count {
            terminal.move_cursor(0, -1)?;
            terminal.erase_line()?;
        }
        Ok(())
    }

    pub fn should_initialize(&self) -> bool {
        self.child
            .as_ref()
            .is_some_and(|child| child.should_initialize())
    }

    /// Run the child's one-time setup when it asks for one.
    ///
    /// Returns the number of stray lines the setup left on screen.
    pub async fn initialize(&self, prompter: &dyn Prompter) -> Result<usize, UiError> {
        match &self.child {
            Some(child) if child.should_initialize() => child.initialize(prompter).await,
            _ => Ok(0),
        }
    }

    /// Erase and redraw the child, reporting both phases to `notify`.
    pub fn request_rerender<F>(&mut self, terminal: &mut dyn Terminal, mut notify: F) -> io::Result<()>
    where
        F: FnMut(RerenderEvent, &mut dyn Terminal) -> io::Result<()>,
    {
        notify(RerenderEvent::Before, &mut *terminal)?;
        self.reset(&mut *terminal)?;
        self.render(&mut *terminal)?;
        notify(RerenderEvent::After, terminal)
    }
}

impl fmt::Debug for RootCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootCoordinator")
            .field("has_child", &self.child.is_some())
            .field("last_line_count", &self.last_line_count)
            .field("offset", &self.offset)
            .finish()
    }
}

fn to_rows(lines: usize) -> i32 {
    i32::try_from(lines).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::terminal::{BufferTerminal, TerminalOp};
    use crate::ui::views::LogView;
    use pretty_assertions::assert_eq;

    fn coordinator(text: &str) -> RootCoordinator {
        RootCoordinator::new(LogView::detached(text).as_view())
    }

    #[test]
    fn reset_before_any_render_is_a_no_op() {
        let mut term = BufferTerminal::new();
        coordinator("x").reset(&mut term).unwrap();
        assert!(term.ops().is_empty());
    }

    #[test]
    fn reset_erases_exactly_the_rendered_rows() {
        // Two rendered rows produce two up-and-erase pairs.
        let mut term = BufferTerminal::new();
        let mut root = coordinator("a\nb");
        assert_eq!(root.render(&mut term).unwrap(), 2);
        term.clear();

        root.reset(&mut term).unwrap();
        assert_eq!(
            term.ops(),
            vec![
                TerminalOp::Column(0),
                TerminalOp::Move { d_col: 0, d_row: -1 },
                TerminalOp::EraseLine,
                TerminalOp::Move { d_col: 0, d_row: -1 },
                TerminalOp::EraseLine,
            ]
        );
    }

    #[test]
    fn offset_shifts_render_and_reset() {
        let mut term = BufferTerminal::new();
        let mut root = coordinator("a");
        root.set_child_offset(2);
        root.render(&mut term).unwrap();
        root.reset(&mut term).unwrap();
        assert_eq!(
            term.ops(),
            vec![
                TerminalOp::Write("a\n".into()),
                TerminalOp::Move { d_col: 0, d_row: 2 },
                TerminalOp::Column(0),
                TerminalOp::Move { d_col: 0, d_row: -2 },
                TerminalOp::Move { d_col: 0, d_row: -1 },
                TerminalOp::EraseLine,
            ]
        );
    }

    #[test]
    fn empty_coordinator_draws_nothing() {
        let mut term = BufferTerminal::new();
        let mut root = RootCoordinator::empty();
        assert_eq!(root.render(&mut term).unwrap(), 0);
        root.reset(&mut term).unwrap();
        assert!(term.ops().is_empty());
        assert!(!root.should_initialize());
    }

    #[test]
    fn rerender_brackets_the_repaint_with_events() {
        // Before fires ahead of the erase, After once the child is redrawn.
        let mut term = BufferTerminal::new();
        let mut root = coordinator("x");
        root.render(&mut term).unwrap();
        term.clear();

        let mut events = Vec::new();
        root.request_rerender(&mut term, |event, t| {
            events.push(event);
            t.write_text(match event {
                RerenderEvent::Before => "<",
                RerenderEvent::After => ">",
            })
        })
        .unwrap();

        assert_eq!(events, vec![RerenderEvent::Before, RerenderEvent::After]);
        assert_eq!(
            term.ops(),
            vec![
                TerminalOp::Write("<".into()),
                TerminalOp::Column(0),
                TerminalOp::Move { d_col: 0, d_row: -1 },
                TerminalOp::EraseLine,
                TerminalOp::Write("x\n".into()),
                TerminalOp::Write(">".into()),
            ]
        );
    }
}
