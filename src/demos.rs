//! Demo commands bundled with the `strata` binary.

use async_trait::async_trait;
use rand::Rng;
use serde_json::json;
use std::time::Duration;
use strata::cli::Cli;
use strata::command::{populate_flags, Command};
use strata::error::{CliError, FlagError};
use strata::flags::{FlagDefinition, ParsedFlags};
use strata::ui::session::Session;
use strata::ui::views::{QuestionOptions, QuestionProps, TaskOptions, TaskStatus};

pub fn register_all(cli: &mut Cli) -> Result<(), CliError> {
    cli.register(Calculate::new())?;
    cli.register(Deploy::new())?;
    cli.register(Survey)?;
    Ok(())
}

fn required_str<'a>(flags: &'a ParsedFlags, name: &str) -> Result<&'a str, CliError> {
    flags
        .string(name)
        .ok_or_else(|| FlagError::Missing(name.to_string()).into())
}

fn required_number(flags: &ParsedFlags, name: &str) -> Result<f64, CliError> {
    flags
        .number(name)
        .ok_or_else(|| FlagError::Missing(name.to_string()).into())
}

/// Simulated work time so spinners have something to do.
fn jitter(min_ms: u64, max_ms: u64) -> Duration {
    Duration::from_millis(rand::thread_rng().gen_range(min_ms..max_ms))
}

// ---------------------------------------------------------------------------
// calculate
// ---------------------------------------------------------------------------

struct Calculate {
    flags: Vec<FlagDefinition>,
}

impl Calculate {
    fn new() -> Self {
        Self {
            flags: vec![
                FlagDefinition::enumeration(
                    "operator",
                    Some('o'),
                    "Operator for the calculation.",
                    ["+", "-", "*", "/"],
                ),
                FlagDefinition::number("a", None, "The first operand."),
                FlagDefinition::number("b", None, "The second operand."),
            ],
        }
    }

    async fn main(&self, session: &Session, flags: &ParsedFlags) -> Result<(), CliError> {
        let operator = required_str(flags, "operator")?;
        let a = required_number(flags, "a")?;
        let b = required_number(flags, "b")?;

        let task = session.task("Calculating...", TaskOptions::default())?;
        tokio::time::sleep(jitter(600, 1200)).await;

        let result = match operator {
            "+" => a + b,
            "-" => a - b,
            "*" => a * b,
            "/" if b == 0.0 => {
                task.set_status(TaskStatus::Failed)?;
                return Err(CliError::Command("cannot divide by zero".to_string()));
            }
            "/" => a / b,
            other => return Err(CliError::Command(format!("unsupported operator '{other}'"))),
        };
        task.set_status(TaskStatus::Completed)?;
        session.log(format!("Answer: {result}"))?;
        Ok(())
    }
}

#[async_trait]
impl Command for Calculate {
    fn name(&self) -> &str {
        "calculate"
    }

    fn description(&self) -> &str {
        "A simple command line calculator."
    }

    fn flags(&self) -> &[FlagDefinition] {
        &self.flags
    }

    async fn run_interactive(&self, session: &Session) -> Result<(), CliError> {
        let flags = populate_flags(session, &self.flags).await?;
        self.main(session, &flags).await
    }

    async fn run_static(&self, session: &Session, flags: ParsedFlags) -> Result<(), CliError> {
        self.main(session, &flags).await
    }
}

// ---------------------------------------------------------------------------
// deploy
// ---------------------------------------------------------------------------

const DEPLOY_STEPS: [&str; 3] = ["Building image", "Pushing image", "Rolling out"];

struct Deploy {
    flags: Vec<FlagDefinition>,
}

impl Deploy {
    fn new() -> Self {
        Self {
            flags: vec![
                FlagDefinition::enumeration(
                    "service",
                    Some('s'),
                    "Service to deploy.",
                    ["frontend", "backend"],
                ),
                FlagDefinition::enumeration(
                    "environment",
                    Some('e'),
                    "Environment to deploy to.",
                    ["dev", "staging", "prod"],
                ),
                FlagDefinition::string("token", Some('t'), "Authentication token for Kubernetes.")
                    .optional(),
            ],
        }
    }

    async fn main(&self, session: &Session, flags: &ParsedFlags) -> Result<(), CliError> {
        let service = required_str(flags, "service")?;
        let environment = required_str(flags, "environment")?;
        let token = flags.string("token").filter(|token| !token.is_empty());

        // The headline grows a second line once the rollout settles, which
        // moves every task below it.
        let headline = session.log(format!("Deploying {service} to {environment}"))?;
        let tasks = DEPLOY_STEPS
            .iter()
            .map(|step| session.task(*step, TaskOptions::default()))
            .collect::<Result<Vec<_>, _>>()?;

        for (step, task) in DEPLOY_STEPS.iter().zip(&tasks) {
            tokio::time::sleep(jitter(400, 1100)).await;
            if *step == "Rolling out" && environment == "prod" && token.is_none() {
                task.set_status(TaskStatus::Failed)?;
                headline.set_text(format!(
                    "Deploying {service} to {environment}\nrollout refused"
                ))?;
                return Err(CliError::Command(
                    "a token is required to deploy to prod".to_string(),
                ));
            }
            task.set_status(TaskStatus::Completed)?;
        }

        headline.set_text(format!(
            "Deploying {service} to {environment}\n{} steps finished",
            tasks.len()
        ))?;
        Ok(())
    }
}

#[async_trait]
impl Command for Deploy {
    fn name(&self) -> &str {
        "deploy"
    }

    fn description(&self) -> &str {
        "Deploy a monorepo service to Kubernetes."
    }

    fn flags(&self) -> &[FlagDefinition] {
        &self.flags
    }

    async fn run_interactive(&self, session: &Session) -> Result<(), CliError> {
        let flags = populate_flags(session, &self.flags).await?;
        self.main(session, &flags).await
    }

    async fn run_static(&self, session: &Session, flags: ParsedFlags) -> Result<(), CliError> {
        self.main(session, &flags).await
    }
}

// ---------------------------------------------------------------------------
// survey
// ---------------------------------------------------------------------------

struct Survey;

impl Survey {
    async fn main(&self, session: &Session) -> Result<(), CliError> {
        let name = session
            .ask_string("What is your name?", QuestionOptions::default())
            .await?;
        let age = session
            .ask_number("How old are you?", QuestionOptions::default())
            .await?;
        let color = session
            .ask_enum(
                QuestionProps::with_choices(
                    "Favourite color?",
                    ["red", "green", "blue", "orange", "purple", "teal"],
                ),
                QuestionOptions { page_size: Some(4) },
            )
            .await?;
        let subscribe = session
            .ask_boolean("Subscribe to updates?", QuestionOptions::default())
            .await?;

        let answers = json!({
            "name": name.value(),
            "age": age.value(),
            "color": color.value(),
            "subscribe": subscribe.value(),
        });
        let pretty = serde_json::to_string_pretty(&answers)
            .map_err(|e| CliError::Command(format!("failed to encode answers: {e}")))?;
        session.log(pretty)?;
        Ok(())
    }
}

#[async_trait]
impl Command for Survey {
    fn name(&self) -> &str {
        "survey"
    }

    fn description(&self) -> &str {
        "Ask one question of every kind and print the answers."
    }

    fn flags(&self) -> &[FlagDefinition] {
        &[]
    }

    async fn run_interactive(&self, session: &Session) -> Result<(), CliError> {
        self.main(session).await
    }

    async fn run_static(&self, session: &Session, _flags: ParsedFlags) -> Result<(), CliError> {
        self.main(session).await
    }
}
