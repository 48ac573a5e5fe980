//! Declarative parameter descriptions.
//!
//! A [`ParameterSpec`] is built once, with a builder chain, when a command is
//! registered:
//!
//! ```rust
//! use saludos::param::ParameterSpec;
//!
//! let name = ParameterSpec::argument("name").help("Who to greet");
//! let loud = ParameterSpec::flag("loud").short('l');
//! assert!(name.is_required());
//! assert!(!loud.is_required());
//! ```

use crate::args::ResolvedArgs;
use crate::error::Abort;
use crate::value::{Value, ValueType};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Positional,
    Named,
}

/// What a callback wants to happen after it ran.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Keep resolving, with this value in place of the original.
    Continue(Value),
    /// Stop successfully without running the command body.
    Exit(Option<String>),
}

impl Flow {
    pub fn exit() -> Self {
        Flow::Exit(None)
    }

    pub fn exit_with(message: impl Into<String>) -> Self {
        Flow::Exit(Some(message.into()))
    }
}

pub type Callback = Arc<dyn Fn(Value) -> Result<Flow, Abort> + Send + Sync>;

/// Suggests completion candidates given the partially resolved values and
/// the word being completed. Advisory only.
pub type ChoicesProvider = Arc<dyn Fn(&ResolvedArgs, &str) -> Vec<String> + Send + Sync>;

pub const ARGUMENTS_PANEL: &str = "Arguments";
pub const OPTIONS_PANEL: &str = "Options";

#[derive(Clone)]
pub struct ParameterSpec {
    name: String,
    kind: Kind,
    value_type: ValueType,
    required: bool,
    default: Option<Value>,
    env_var: Option<String>,
    prompt: Option<String>,
    confirm_prompt: Option<String>,
    hidden: bool,
    eager: bool,
    multiple: bool,
    long: Option<String>,
    short: Option<char>,
    help: Option<String>,
    help_panel: Option<String>,
    metavar: Option<String>,
    callback: Option<Callback>,
    choices: Option<ChoicesProvider>,
}

impl ParameterSpec {
    fn new(name: &str, kind: Kind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            value_type: ValueType::Text,
            required: kind == Kind::Positional,
            default: None,
            env_var: None,
            prompt: None,
            confirm_prompt: None,
            hidden: false,
            eager: false,
            multiple: false,
            long: None,
            short: None,
            help: None,
            help_panel: None,
            metavar: None,
            callback: None,
            choices: None,
        }
    }

    /// A positional argument. Required until given a default or marked optional.
    pub fn argument(name: &str) -> Self {
        Self::new(name, Kind::Positional)
    }

    /// A named option, matched by `--<name>` (underscores become dashes).
    pub fn option(name: &str) -> Self {
        let mut spec = Self::new(name, Kind::Named);
        spec.long = Some(name.replace('_', "-"));
        spec
    }

    /// A boolean option defaulting to false, with a `--no-<name>` counterpart.
    pub fn flag(name: &str) -> Self {
        Self::option(name)
            .value_type(ValueType::Bool)
            .default(false)
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Sets the fallback value. A parameter with a default is never required.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self.required = false;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self.default = None;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn env(mut self, var: &str) -> Self {
        self.env_var = Some(var.to_string());
        self
    }

    pub fn prompt(mut self, text: &str) -> Self {
        self.prompt = Some(text.to_string());
        self
    }

    /// Asks a second time and requires both entries to match. Implies a prompt.
    pub fn confirmation_prompt(mut self, text: &str) -> Self {
        if self.prompt.is_none() {
            self.prompt = Some(capitalize(&self.name));
        }
        self.confirm_prompt = Some(text.to_string());
        self
    }

    /// Typed characters are not echoed while prompting.
    pub fn hide_input(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn eager(mut self) -> Self {
        self.eager = true;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn long(mut self, long: &str) -> Self {
        self.long = Some(long.trim_start_matches('-').to_string());
        self
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn help(mut self, text: &str) -> Self {
        self.help = Some(text.to_string());
        self
    }

    pub fn help_panel(mut self, panel: &str) -> Self {
        self.help_panel = Some(panel.to_string());
        self
    }

    pub fn metavar(mut self, metavar: &str) -> Self {
        self.metavar = Some(metavar.to_string());
        self
    }

    pub fn callback<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Result<Flow, Abort> + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(f));
        self
    }

    /// A callback that only transforms or rejects the value.
    pub fn validate<F>(self, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, Abort> + Send + Sync + 'static,
    {
        self.callback(move |value| f(value).map(Flow::Continue))
    }

    pub fn choices<F>(mut self, f: F) -> Self
    where
        F: Fn(&ResolvedArgs, &str) -> Vec<String> + Send + Sync + 'static,
    {
        self.choices = Some(Arc::new(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn is_positional(&self) -> bool {
        self.kind == Kind::Positional
    }

    pub fn get_value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn is_bool(&self) -> bool {
        self.value_type == ValueType::Bool
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn env_var(&self) -> Option<&str> {
        self.env_var.as_deref()
    }

    pub fn prompt_text(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn confirm_prompt_text(&self) -> Option<&str> {
        self.confirm_prompt.as_deref()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_eager(&self) -> bool {
        self.eager
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn get_callback(&self) -> Option<&Callback> {
        self.callback.as_ref()
    }

    pub fn get_choices(&self) -> Option<&ChoicesProvider> {
        self.choices.as_ref()
    }

    /// `--long`, if the parameter is named.
    pub fn long_flag(&self) -> Option<String> {
        match self.kind {
            Kind::Named => self.long.as_ref().map(|l| format!("--{}", l)),
            Kind::Positional => None,
        }
    }

    pub fn short_flag(&self) -> Option<String> {
        match self.kind {
            Kind::Named => self.short.map(|c| format!("-{}", c)),
            Kind::Positional => None,
        }
    }

    /// `--no-long` for boolean options. Eager flags have no negative form.
    pub fn negative_flag(&self) -> Option<String> {
        if self.is_bool() && !self.eager {
            self.long.as_ref().map(|l| format!("--no-{}", l))
        } else {
            None
        }
    }

    /// Every flag string this parameter answers to.
    pub fn flags(&self) -> Vec<String> {
        [self.long_flag(), self.short_flag(), self.negative_flag()]
            .into_iter()
            .flatten()
            .collect()
    }

    pub fn panel(&self) -> &str {
        match (&self.help_panel, self.kind) {
            (Some(panel), _) => panel,
            (None, Kind::Positional) => ARGUMENTS_PANEL,
            (None, Kind::Named) => OPTIONS_PANEL,
        }
    }

    /// How the value is shown in usage and help: `NAME` for arguments, the
    /// type for options.
    pub fn display_metavar(&self) -> String {
        if let Some(m) = &self.metavar {
            return m.clone();
        }
        let base = match self.kind {
            Kind::Positional => self.name.to_uppercase(),
            Kind::Named => self.value_type.metavar().to_string(),
        };
        if self.multiple && self.is_positional() {
            format!("{}...", base)
        } else {
            base
        }
    }

    /// Label used in failure messages, e.g. `'--user'` or `'NAME'`.
    pub fn label(&self) -> String {
        match self.kind {
            Kind::Positional => format!("'{}'", self.display_metavar()),
            Kind::Named => {
                let flags: Vec<String> = [self.long_flag(), self.short_flag()]
                    .into_iter()
                    .flatten()
                    .collect();
                format!("'{}'", flags.join("' / '"))
            }
        }
    }
}

impl fmt::Debug for ParameterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("value_type", &self.value_type)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("env_var", &self.env_var)
            .field("eager", &self.eager)
            .field("multiple", &self.multiple)
            .field("callback", &self.callback.is_some())
            .finish_non_exhaustive()
    }
}

fn capitalize(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
