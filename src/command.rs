//! The command contract and interactive flag population.

use crate::error::{CliError, UiError};
use crate::flags::{FlagDefinition, FlagKind, ParsedFlags};
use crate::ui::session::Session;
use crate::ui::views::{QuestionOptions, QuestionProps};
use async_trait::async_trait;
use tracing::{debug, info};

const INTERACTIVE_INTRO: &str =
    "\nYou entered interactive mode. Please answer the following questions.\n";
const INVALID_VALUE: &str = "Invalid value. Please try again.";
const POPULATED_SUMMARY: &str = "\nFlags populated. If you want to run the command with the same configuration again, you can do it with the following flags.\n";

/// A named unit of work with typed flags.
///
/// Commands run either statically, with flags parsed from the command line,
/// or interactively, asking for values through the session.
#[async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn flags(&self) -> &[FlagDefinition];

    async fn run_interactive(&self, session: &Session) -> Result<(), CliError>;

    async fn run_static(&self, session: &Session, flags: ParsedFlags) -> Result<(), CliError>;
}

/// Ask for every flag in order, re-asking until each value parses.
///
/// Numbers are asked as text and validated by the flag. An empty answer
/// counts as not supplied, so a required flag is asked again.
pub async fn populate_flags(
    session: &Session,
    definitions: &[FlagDefinition],
) -> Result<ParsedFlags, CliError> {
    session.log(INTERACTIVE_INTRO)?;

    let mut parsed = ParsedFlags::new();
    for flag in definitions {
        loop {
            let raw = ask_raw(session, flag).await?;
            match flag.parse(raw.as_deref()) {
                Ok(value) => {
                    parsed.insert(flag.long_name.clone(), value);
                    break;
                }
                Err(err) => {
                    debug!(error = %err, "interactive flag value rejected");
                    session.log(INVALID_VALUE)?;
                }
            }
        }
    }

    session.log(POPULATED_SUMMARY)?;
    session.log(format!("{}\n", parsed.command_line()))?;
    info!(flags = parsed.len(), "flags populated interactively");
    Ok(parsed)
}

async fn ask_raw(session: &Session, flag: &FlagDefinition) -> Result<Option<String>, UiError> {
    let question = format!(
        "(--{}) {} <{}>",
        flag.long_name,
        flag.description,
        flag.argument_type()
    );
    let options = QuestionOptions::default();
    let raw = match &flag.kind {
        FlagKind::Boolean => session
            .ask_boolean(question, options)
            .await?
            .value()
            .map(|value| value.to_string()),
        FlagKind::Enum { choices } => session
            .ask_enum(QuestionProps::with_choices(question, choices.clone()), options)
            .await?
            .value(),
        FlagKind::Number | FlagKind::String => {
            session.ask_string(question, options).await?.value()
        }
    };
    Ok(raw.filter(|value| !value.trim().is_empty()))
}
