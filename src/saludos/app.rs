//! # Command Dispatcher
//!
//! [`App`] is the registry of commands. Registration validates each
//! [`CommandSpec`] and gives it an eager `--help` option; [`App::dispatch`]
//! picks the command named by the first token, resolves the rest and runs
//! the body.

use crate::command::CommandSpec;
use crate::error::{Abort, Failure, SpecError};
use crate::help::render_command_help;
use crate::param::{Flow, ParameterSpec};
use crate::prompt::InputSource;
use crate::resolver::{Outcome, Resolver};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// How a dispatched command finished, when it did not fail to resolve.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// The body ran to completion.
    Ran,
    /// An eager option or callback stopped before the body.
    Exited(Option<String>),
    /// The body gave up.
    Aborted(Abort),
}

#[derive(Debug, Clone)]
pub struct App {
    name: String,
    about: Option<String>,
    commands: Vec<CommandSpec>,
    confirm_attempts: u32,
}

impl App {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            about: None,
            commands: Vec::new(),
            confirm_attempts: 1,
        }
    }

    pub fn about(mut self, text: &str) -> Self {
        self.about = Some(text.to_string());
        self
    }

    pub fn confirm_attempts(mut self, attempts: u32) -> Self {
        self.confirm_attempts = attempts.max(1);
        self
    }

    /// Builder form of [`App::register`].
    pub fn command(mut self, command: CommandSpec) -> Result<Self, SpecError> {
        self.register(command)?;
        Ok(self)
    }

    pub fn register(&mut self, command: CommandSpec) -> Result<(), SpecError> {
        if self.find(command.name()).is_some() {
            return Err(SpecError::DuplicateCommand(command.name().to_string()));
        }
        let command = self.with_help_option(command);
        command.validate()?;
        debug!(command = command.name(), params = command.params().len(), "registered");
        self.commands.push(command);
        Ok(())
    }

    /// Appends `--help`, unless the command already has a `help` parameter
    /// or answers to the flag.
    fn with_help_option(&self, command: CommandSpec) -> CommandSpec {
        let taken = command
            .params()
            .iter()
            .any(|p| p.name() == "help" || p.flags().iter().any(|f| f == "--help"));
        if taken {
            return command;
        }

        let help = ParameterSpec::flag("help")
            .eager()
            .help("Show this message and exit.");
        let page = Arc::new(command.clone().param(help.clone()));
        let app_name = self.name.clone();
        command.param(help.callback(move |_| {
            let text = render_command_help(&app_name, &page, console::colors_enabled())
                .map_err(|e| Abort::new(e.to_string()))?;
            Ok(Flow::exit_with(text))
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn about_text(&self) -> Option<&str> {
        self.about.as_deref()
    }

    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    pub fn find(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name() == name)
    }

    /// Selects the command named by `tokens[0]` and runs it with the rest.
    pub fn dispatch(
        &self,
        tokens: &[String],
        env: &HashMap<String, String>,
        input: &mut dyn InputSource,
    ) -> Result<Dispatch, Failure> {
        let Some((name, rest)) = tokens.split_first() else {
            return Err(Failure::missing("COMMAND", "Missing command."));
        };
        let command = self
            .find(name)
            .ok_or_else(|| Failure::unknown(name, format!("No such command '{}'.", name)))?;

        info!(command = command.name(), tokens = rest.len(), "dispatching");
        let outcome = Resolver::new(env, input)
            .with_confirm_attempts(self.confirm_attempts)
            .resolve(command, rest)?;

        let args = match outcome {
            Outcome::Resolved(args) => args,
            Outcome::Exited(message) => return Ok(Dispatch::Exited(message)),
        };

        let Some(body) = command.get_body() else {
            return Ok(Dispatch::Ran);
        };
        match body(&args) {
            Ok(()) => Ok(Dispatch::Ran),
            Err(abort) => {
                debug!(command = command.name(), reason = %abort, "body aborted");
                Ok(Dispatch::Aborted(abort))
            }
        }
    }
}
