//! Strata: stacked, independently re-rendering terminal views.
//!
//! A [`Session`](ui::session::Session) keeps an ordered stack of views on the
//! terminal. Any view can change its state and repaint itself in place; the
//! views printed after it are erased and redrawn so the stack stays intact.
//! On top of the view engine sits a small command shell with typed flags,
//! static and interactive invocation, and generated help.
//!
//! # Quick start
//!
//! ```no_run
//! use strata::ui::session::{Session, SessionOptions};
//! use strata::ui::views::{TaskOptions, TaskStatus};
//!
//! # async fn example() -> Result<(), strata::error::UiError> {
//! let session = Session::stdout(SessionOptions::default());
//! session.log("Deploying")?;
//! let task = session.task("Building image", TaskOptions::default())?;
//! task.set_status(TaskStatus::Completed)?;
//! # Ok(())
//! # }
//! ```

pub mod build_info;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod flags;
pub mod logging;
#[cfg(test)]
pub mod testsupport;
pub mod tui;
pub mod ui;
