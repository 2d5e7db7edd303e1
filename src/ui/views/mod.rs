//! Concrete view kinds a session can stack.

pub mod log;
pub mod question;
pub mod task;

pub use log::LogView;
pub use question::{
    BooleanQuestion, EnumQuestion, NumberQuestion, QuestionKind, QuestionOptions, QuestionProps,
    QuestionView, StringQuestion,
};
pub use task::{TaskOptions, TaskProps, TaskStatus, TaskView};
