//! Questions answered once through the prompter, then shown as
//! `question: answer`.

use crate::error::{PromptError, UiError};
use crate::tui::prompt::{Answer, PromptKind, PromptRequest, Prompter};
use crate::tui::settings::{ANSWER_NO, ANSWER_SEPARATOR, ANSWER_YES};
use crate::tui::terminal::Terminal;
use crate::ui::view::{line_count, Parent, View, ViewCore};
use async_trait::async_trait;
use std::fmt;
use std::io;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Ties a question kind to its answer type and display form.
pub trait QuestionKind: Send + Sync + 'static {
    type Value: Clone + fmt::Debug + Send + Sync + 'static;

    const KIND: PromptKind;

    /// Extract the typed value; `None` when the answer is of another kind.
    fn accept(answer: Answer) -> Option<Self::Value>;

    fn display(value: &Self::Value) -> String;
}

/// Yes/no question.
#[derive(Debug)]
pub enum Boolean {}

/// Pick one of a fixed list of choices.
#[derive(Debug)]
pub enum Enum {}

/// Numeric answer.
#[derive(Debug)]
pub enum Number {}

/// Free-form text answer.
#[derive(Debug)]
pub enum Text {}

impl QuestionKind for Boolean {
    type Value = bool;
    const KIND: PromptKind = PromptKind::Boolean;

    fn accept(answer: Answer) -> Option<bool> {
        match answer {
            Answer::Boolean(value) => Some(value),
            _ => None,
        }
    }

    fn display(value: &bool) -> String {
        let answer = if *value { ANSWER_YES } else { ANSWER_NO };
        answer.to_string()
    }
}

impl QuestionKind for Enum {
    type Value = String;
    const KIND: PromptKind = PromptKind::Enum;

    fn accept(answer: Answer) -> Option<String> {
        match answer {
            Answer::Enum(value) => Some(value),
            _ => None,
        }
    }

    fn display(value: &String) -> String {
        value.clone()
    }
}

impl QuestionKind for Number {
    type Value = f64;
    const KIND: PromptKind = PromptKind::Number;

    fn accept(answer: Answer) -> Option<f64> {
        match answer {
            Answer::Number(value) => Some(value),
            _ => None,
        }
    }

    fn display(value: &f64) -> String {
        value.to_string()
    }
}

impl QuestionKind for Text {
    type Value = String;
    const KIND: PromptKind = PromptKind::Text;

    fn accept(answer: Answer) -> Option<String> {
        match answer {
            Answer::Text(value) => Some(value),
            _ => None,
        }
    }

    fn display(value: &String) -> String {
        value.clone()
    }
}

pub type BooleanQuestion = QuestionView<Boolean>;
pub type EnumQuestion = QuestionView<Enum>;
pub type NumberQuestion = QuestionView<Number>;
pub type StringQuestion = QuestionView<Text>;

/// Question text plus, for enum questions, the selectable choices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionProps {
    pub question: String,
    pub choices: Vec<String>,
}

impl QuestionProps {
    pub fn with_choices<I, S>(question: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            question: question.into(),
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&str> for QuestionProps {
    fn from(question: &str) -> Self {
        Self {
            question: question.to_string(),
            choices: Vec::new(),
        }
    }
}

impl From<String> for QuestionProps {
    fn from(question: String) -> Self {
        Self {
            question,
            choices: Vec::new(),
        }
    }
}

/// Construction options for a question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuestionOptions {
    /// Rows shown by an enum picker; the session default when absent.
    pub page_size: Option<usize>,
}

struct QuestionState<V> {
    value: Option<V>,
}

struct QuestionInner<K: QuestionKind> {
    core: ViewCore<QuestionState<K::Value>>,
    request: PromptRequest,
    _kind: PhantomData<fn() -> K>,
}

#[async_trait]
impl<K: QuestionKind> View for QuestionInner<K> {
    fn render(&self, terminal: &mut dyn Terminal) -> io::Result<usize> {
        let answer = self
            .core
            .read(|state| state.value.as_ref().map(K::display))
            .unwrap_or_default();
        let line = format!("{}{ANSWER_SEPARATOR}{answer}", self.request.message);
        terminal.write_text(&format!("{line}\n"))?;
        Ok(line_count(&line))
    }

    fn should_initialize(&self) -> bool {
        true
    }

    async fn initialize(&self, prompter: &dyn Prompter) -> Result<usize, UiError> {
        if self.core.read(|state| state.value.is_some()) {
            return Ok(0);
        }
        let reply = prompter.ask(&self.request).await?;
        let answered = reply.answer.kind();
        let Some(value) = K::accept(reply.answer) else {
            debug!(expected = %K::KIND, got = %answered, "prompt answered with the wrong kind");
            return Err(PromptError::Mismatch(K::KIND).into());
        };
        debug!(kind = %K::KIND, answer = ?value, "question answered");
        self.core.update(|state| state.value = Some(value));
        Ok(reply.lines_printed)
    }
}

/// Handle to an answered (or pending) question.
pub struct QuestionView<K: QuestionKind> {
    inner: Arc<QuestionInner<K>>,
}

impl<K: QuestionKind> Clone for QuestionView<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: QuestionKind> QuestionView<K> {
    pub(crate) fn new(
        parent: Parent,
        props: QuestionProps,
        options: QuestionOptions,
        default_page_size: usize,
    ) -> Self {
        let request = PromptRequest::new(K::KIND, props.question)
            .with_choices(props.choices)
            .with_page_size(options.page_size.unwrap_or(default_page_size));
        Self {
            inner: Arc::new(QuestionInner {
                core: ViewCore::new(QuestionState { value: None }, parent),
                request,
                _kind: PhantomData,
            }),
        }
    }

    /// Unanswered question that is not part of any session.
    pub fn detached(props: impl Into<QuestionProps>) -> Self {
        Self::new(
            Parent::detached(),
            props.into(),
            QuestionOptions::default(),
            crate::tui::settings::PROMPT_DEFAULT_PAGE_SIZE,
        )
    }

    pub fn question(&self) -> &str {
        &self.inner.request.message
    }

    pub fn choices(&self) -> &[String] {
        &self.inner.request.choices
    }

    /// Recorded answer; `None` until the question has been asked.
    pub fn value(&self) -> Option<K::Value> {
        self.inner.core.read(|state| state.value.clone())
    }

    /// Ask the question through `prompter` and record the answer.
    ///
    /// Returns the number of lines the prompt left on screen. A question that
    /// already has an answer is not asked again.
    pub async fn initialize(&self, prompter: &dyn Prompter) -> Result<usize, UiError> {
        self.inner.initialize(prompter).await
    }

    /// Draw the question directly, bypassing its coordinator.
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

impl<K: QuestionKind> fmt::Debug for QuestionView<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestionView")
            .field("kind", &K::KIND)
            .field("question", &self.question())
            .field("value", &self.value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::ScriptedPrompter;
    use crate::tui::terminal::BufferTerminal;

    #[test]
    fn unanswered_question_renders_empty_answer() {
        let mut term = BufferTerminal::new();
        let view = StringQuestion::detached("Name");
        assert_eq!(view.value(), None);
        assert_eq!(view.render(&mut term).unwrap(), 1);
        assert_eq!(term.writes(), vec!["Name: \n".to_string()]);
    }

    #[tokio::test]
    async fn enum_answer_is_recorded_and_rendered() {
        // The chosen value is exposed and shown after the question.
        let prompter = ScriptedPrompter::new([Answer::Enum("blue".into())]);
        let view = EnumQuestion::detached(QuestionProps::with_choices("Color", ["red", "blue"]));
        view.initialize(&prompter).await.unwrap();

        assert_eq!(view.value().as_deref(), Some("blue"));
        let mut term = BufferTerminal::new();
        view.render(&mut term).unwrap();
        assert_eq!(term.writes(), vec!["Color: blue\n".to_string()]);

        let asked = prompter.requests();
        assert_eq!(asked[0].kind, PromptKind::Enum);
        assert_eq!(asked[0].choices, vec!["red".to_string(), "blue".to_string()]);
    }

    #[tokio::test]
    async fn boolean_renders_yes_or_no() {
        let prompter = ScriptedPrompter::new([Answer::Boolean(true), Answer::Boolean(false)]);
        let yes = BooleanQuestion::detached("Ship it");
        let no = BooleanQuestion::detached("Roll back");
        yes.initialize(&prompter).await.unwrap();
        no.initialize(&prompter).await.unwrap();

        let mut term = BufferTerminal::new();
        yes.render(&mut term).unwrap();
        no.render(&mut term).unwrap();
        assert_eq!(
            term.writes(),
            vec!["Ship it: Yes\n".to_string(), "Roll back: No\n".to_string()]
        );
    }

    #[tokio::test]
    async fn number_uses_shortest_float_form() {
        let prompter = ScriptedPrompter::new([Answer::Number(34.0)]);
        let view = NumberQuestion::detached("Age");
        view.initialize(&prompter).await.unwrap();

        let mut term = BufferTerminal::new();
        view.render(&mut term).unwrap();
        assert_eq!(term.writes(), vec!["Age: 34\n".to_string()]);
    }

    #[tokio::test]
    async fn answer_of_wrong_kind_is_a_mismatch() {
        let prompter = ScriptedPrompter::new([Answer::Text("maybe".into())]);
        let view = BooleanQuestion::detached("Continue");
        let err = view.initialize(&prompter).await.unwrap_err();
        assert!(matches!(
            err,
            UiError::Prompt(PromptError::Mismatch(PromptKind::Boolean))
        ));
        assert_eq!(view.value(), None);
    }

    #[tokio::test]
    async fn answered_question_is_not_asked_twice() {
        // The answer is recorded once and is immutable afterwards.
        let prompter = ScriptedPrompter::new([Answer::Text("first".into())]).with_residue(2);
        let view = StringQuestion::detached("Name");
        assert_eq!(view.initialize(&prompter).await.unwrap(), 2);
        assert_eq!(view.initialize(&prompter).await.unwrap(), 0);
        assert_eq!(prompter.requests().len(), 1);
        assert_eq!(view.value().as_deref(), Some("first"));
    }

    #[test]
    fn page_size_option_overrides_default() {
        let view = EnumQuestion::new(
            Parent::detached(),
            QuestionProps::with_choices("Pick", ["a"]),
            QuestionOptions { page_size: Some(2) },
            7,
        );
        assert_eq!(view.inner.request.page_size, 2);
    }
}
