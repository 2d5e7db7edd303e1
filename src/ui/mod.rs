//! The view engine.
//!
//! Views render themselves as whole lines, root coordinators track how many
//! lines each view occupies, and the session registry cascades erases and
//! repaints down the stack whenever a view changes.

pub mod root;
pub mod session;
pub mod theme;
pub mod view;
pub mod views;

pub use session::{Session, SessionOptions};
pub use view::{Parent, View};
