//! Command registry and argument parsing via clap.
//!
//! The clap tree is built at runtime from the registered commands: one
//! subcommand per command, one option per flag, plus `--interactive` and a
//! custom `--help` that prints the aligned flag listing.

use crate::build_info;
use crate::command::Command;
use crate::error::CliError;
use crate::flags::{help_block, parse_flags, FlagKind, ParsedFlags};
use crate::ui::session::Session;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgAction, Args, FromArgMatches};
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

const BIN_NAME: &str = "strata";
const HELP_ID: &str = "help";
const INTERACTIVE_ID: &str = "interactive";

/// Long names every subcommand already carries.
const RESERVED_LONG: [&str; 5] = [HELP_ID, INTERACTIVE_ID, "config", "no-color", "version"];
/// Short names every subcommand already carries.
const RESERVED_SHORT: [char; 4] = ['h', 'i', 'c', 'V'];

/// Options shared by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct GlobalArgs {
    /// Path to config file (default: ./strata.toml or ~/.config/strata/strata.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Print version information.
    #[arg(short = 'V', long = "version")]
    pub version: bool,
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    /// No command given: list the registered commands.
    CommandsHelp,
    /// `strata <command> --help`.
    OptionsHelp(String),
    Version,
    /// `strata <command> --interactive`.
    Interactive(String),
    /// `strata <command> --flag value ...`.
    Static { command: String, flags: ParsedFlags },
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArgs {
    pub globals: GlobalArgs,
    pub invocation: Invocation,
}

/// Registered commands, in registration order.
#[derive(Default)]
pub struct Cli {
    commands: Vec<Arc<dyn Command>>,
}

impl Cli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: impl Command + 'static) -> Result<(), CliError> {
        if self.find(command.name()).is_some() {
            return Err(CliError::DuplicateCommand(command.name().to_string()));
        }
        check_flag_names(&command)?;
        self.commands.push(Arc::new(command));
        Ok(())
    }

    /// Overview of every registered command.
    pub fn commands_help(&self) -> String {
        if self.commands.is_empty() {
            return "No commands available.".to_string();
        }
        let width = self
            .commands
            .iter()
            .map(|command| command.name().chars().count())
            .max()
            .unwrap_or(0);
        let mut lines = vec![
            "Run 'COMMAND --help' for more detailed help.".to_string(),
            String::new(),
            "Commands:".to_string(),
        ];
        for command in &self.commands {
            let pad = width - command.name().chars().count();
            lines.push(format!(
                "  {}{}  {}",
                command.name(),
                " ".repeat(pad),
                command.description()
            ));
        }
        lines.join("\n")
    }

    /// Usage, description and flag listing of one command.
    pub fn options_help(&self, name: &str) -> Result<String, CliError> {
        let command = self
            .find(name)
            .ok_or_else(|| CliError::UnknownCommand(name.to_string()))?;
        let options = help_block(command.flags())
            .lines()
            .map(|line| format!("  {line}"))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(format!(
            "Usage: {} [OPTIONS]\n\n{}\n\nOptions:\n{options}",
            command.name(),
            command.description()
        ))
    }

    /// The clap tree matching the registered commands.
    pub fn clap_command(&self) -> clap::Command {
        let root = clap::Command::new(BIN_NAME)
            .about("Stacked terminal views for command-line tools.")
            .disable_help_flag(true)
            .disable_version_flag(true)
            .disable_help_subcommand(true)
            .arg(switch(HELP_ID, 'h', "Print the command list."));
        let root = GlobalArgs::augment_args(root);
        self.commands
            .iter()
            .fold(root, |root, command| root.subcommand(subcommand_for(command.as_ref())))
    }

    /// Parse an argument vector (including the binary name).
    pub fn parse<I, T>(&self, argv: I) -> Result<ParsedArgs, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .clap_command()
            .try_get_matches_from(argv)
            .map_err(usage_error)?;
        let globals =
            GlobalArgs::from_arg_matches(&matches).map_err(|e| CliError::Usage(e.to_string()))?;
        if globals.version {
            return Ok(ParsedArgs {
                globals,
                invocation: Invocation::Version,
            });
        }

        let invocation = match matches.subcommand() {
            None => Invocation::CommandsHelp,
            Some((name, sub)) => {
                let command = self
                    .find(name)
                    .ok_or_else(|| CliError::UnknownCommand(name.to_string()))?;
                if sub.get_flag(HELP_ID) {
                    Invocation::OptionsHelp(name.to_string())
                } else if sub.get_flag(INTERACTIVE_ID) {
                    Invocation::Interactive(name.to_string())
                } else {
                    let lookup = |id: &str| sub.try_get_one::<String>(id).ok().flatten().cloned();
                    Invocation::Static {
                        command: name.to_string(),
                        flags: parse_flags(lookup, command.flags())?,
                    }
                }
            }
        };
        Ok(ParsedArgs {
            globals,
            invocation,
        })
    }

    /// Carry out an invocation, drawing all output through `session`.
    pub async fn dispatch(&self, invocation: Invocation, session: &Session) -> Result<(), CliError> {
        match invocation {
            Invocation::CommandsHelp => {
                session.log(self.commands_help())?;
            }
            Invocation::OptionsHelp(name) => {
                session.log(self.options_help(&name)?)?;
            }
            Invocation::Version => {
                session.log(format!("{BIN_NAME} {}", build_info::cli_version_text()))?;
            }
            Invocation::Interactive(name) => {
                let command = self.require(&name)?;
                info!(command = %name, mode = "interactive", "dispatching command");
                command.run_interactive(session).await?;
            }
            Invocation::Static { command: name, flags } => {
                let command = self.require(&name)?;
                info!(command = %name, mode = "static", flags = flags.len(), "dispatching command");
                command.run_static(session, flags).await?;
            }
        }
        Ok(())
    }

    fn find(&self, name: &str) -> Option<&Arc<dyn Command>> {
        self.commands.iter().find(|command| command.name() == name)
    }

    fn require(&self, name: &str) -> Result<Arc<dyn Command>, CliError> {
        self.find(name)
            .cloned()
            .ok_or_else(|| CliError::UnknownCommand(name.to_string()))
    }
}

/// Flag names must not collide with the built-in switches or each other,
/// since clap refuses to build such a tree.
fn check_flag_names(command: &dyn Command) -> Result<(), CliError> {
    let flags = command.flags();
    for (position, flag) in flags.iter().enumerate() {
        if RESERVED_LONG.contains(&flag.long_name.as_str()) {
            return Err(CliError::ReservedFlag(format!("--{}", flag.long_name)));
        }
        if let Some(short) = flag.short_name.filter(|short| RESERVED_SHORT.contains(short)) {
            return Err(CliError::ReservedFlag(format!("-{short}")));
        }
        let earlier = &flags[..position];
        if earlier.iter().any(|other| other.long_name == flag.long_name) {
            return Err(CliError::DuplicateFlag(format!("--{}", flag.long_name)));
        }
        if let Some(short) = flag
            .short_name
            .filter(|short| earlier.iter().any(|other| other.short_name == Some(*short)))
        {
            return Err(CliError::DuplicateFlag(format!("-{short}")));
        }
    }
    Ok(())
}

fn switch(id: &'static str, short: char, help: &'static str) -> Arg {
    Arg::new(id)
        .short(short)
        .long(id)
        .action(ArgAction::SetTrue)
        .help(help)
}

fn subcommand_for(command: &dyn Command) -> clap::Command {
    let base = clap::Command::new(command.name().to_string())
        .about(command.description().to_string())
        .disable_help_flag(true)
        .arg(switch(HELP_ID, 'h', "Print the options of this command."))
        .arg(switch(INTERACTIVE_ID, 'i', "Ask for every flag interactively."));
    command.flags().iter().fold(base, |cmd, flag| {
        let mut arg = Arg::new(flag.long_name.clone())
            .long(flag.long_name.clone())
            .value_name(flag.argument_type())
            .help(flag.description.clone())
            .action(ArgAction::Set);
        if let Some(short) = flag.short_name {
            arg = arg.short(short);
        }
        arg = match flag.kind {
            FlagKind::Boolean => arg.num_args(0..=1).default_missing_value("true"),
            FlagKind::Number => arg.num_args(1).allow_negative_numbers(true),
            FlagKind::Enum { .. } | FlagKind::String => arg.num_args(1),
        };
        cmd.arg(arg)
    })
}

fn usage_error(err: clap::Error) -> CliError {
    if err.kind() == ErrorKind::InvalidSubcommand {
        if let Some(ContextValue::String(name)) = err.get(ContextKind::InvalidSubcommand) {
            return CliError::UnknownCommand(name.clone());
        }
    }
    let text = err.to_string();
    CliError::Usage(text.trim_start_matches("error: ").trim_end().to_string())
}
