//! Repeating timer behind animated task indicators.

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// RAII handle for a running spinner timer.
///
/// Dropping the handle cancels the timer.
#[derive(Debug)]
pub struct SpinnerHandle {
    /// Ticking task, present until the handle is finished.
    task: Option<JoinHandle<()>>,
}

impl SpinnerHandle {
    /// Start calling `on_tick` every `period` until it returns `false` or the
    /// handle is finished.
    ///
    /// Returns `None` when no tokio runtime is available on this thread.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Option<Self>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let runtime = Handle::try_current().ok()?;
        let task = runtime.spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of a tokio interval completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if !on_tick() {
                    break;
                }
            }
        });
        Some(Self { task: Some(task) })
    }

    /// Cancel the timer. Safe to call more than once.
    pub fn finish(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Whether the timer can still fire.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for SpinnerHandle {
    fn drop(&mut self) {
        self.finish();
    }
}
