//! # Command Resolver
//!
//! Turns the raw tokens typed after a command name into a [`ResolvedArgs`]
//! set, following the command's [`ParameterSpec`] list:
//!
//! 1. Eager options found anywhere in the tokens run their callbacks first.
//!    A callback returning [`Flow::Exit`] ends resolution successfully.
//! 2. Tokens are matched: named options by flag, then positionals in order.
//! 3. Each parameter takes the first value available from: its token, its
//!    environment variable, an interactive prompt, its default. A required
//!    parameter with none of these is a failure.
//! 4. Values are converted to the declared type and passed through the
//!    parameter's callback, whose result replaces them.
//!
//! [`Mode::Resilient`] runs the same pipeline without callbacks, prompts or
//! failures. Shell completion uses it to see what has been typed so far.

use crate::args::ResolvedArgs;
use crate::command::CommandSpec;
use crate::error::Failure;
use crate::param::{Flow, ParameterSpec};
use crate::prompt::InputSource;
use crate::value::Value;
use std::collections::HashMap;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Strict,
    /// Dry parse: no callbacks, no prompts, no failures.
    Resilient,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Resolved(ResolvedArgs),
    /// A callback asked to stop; the command body must not run.
    Exited(Option<String>),
}

/// Where a parameter's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Token,
    Env,
    Prompt,
    Default,
}

/// Raw token values per parameter, indexed like `CommandSpec::params`.
#[derive(Debug, Default)]
pub(crate) struct Matched {
    pub(crate) raw: Vec<Vec<String>>,
    /// A value-taking option that ended the token list without its value.
    pub(crate) dangling: Option<usize>,
    pub(crate) extra: Vec<String>,
}

impl Matched {
    fn present(&self, idx: usize) -> bool {
        !self.raw[idx].is_empty()
    }
}

pub struct Resolver<'a> {
    env: &'a HashMap<String, String>,
    input: &'a mut dyn InputSource,
    mode: Mode,
    confirm_attempts: u32,
}

impl<'a> Resolver<'a> {
    pub fn new(env: &'a HashMap<String, String>, input: &'a mut dyn InputSource) -> Self {
        Self {
            env,
            input,
            mode: Mode::Strict,
            confirm_attempts: 1,
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// How many times a confirmation pair may be entered before failing.
    pub fn with_confirm_attempts(mut self, attempts: u32) -> Self {
        self.confirm_attempts = attempts.max(1);
        self
    }

    pub fn resolve(&mut self, command: &CommandSpec, tokens: &[String]) -> Result<Outcome, Failure> {
        let params = command.params();
        let mut values = ResolvedArgs::new();
        let mut done = vec![false; params.len()];

        if self.mode == Mode::Strict {
            let scan = match_tokens(command, tokens, Mode::Resilient)?;
            for (idx, param) in params.iter().enumerate() {
                if !param.is_eager() || !scan.present(idx) {
                    continue;
                }
                debug!(command = command.name(), param = param.name(), "running eager callback");
                let value = self.convert(param, &scan.raw[idx])?;
                match run_callback(param, value)? {
                    Step::Value(value) => values.insert(param.name(), value),
                    Step::Exit(message) => return Ok(Outcome::Exited(message)),
                }
                done[idx] = true;
            }
        }

        let matched = match_tokens(command, tokens, self.mode)?;

        for (idx, param) in params.iter().enumerate() {
            if done[idx] {
                continue;
            }
            let Some((raw, source)) = self.lookup(param, &matched.raw[idx])? else {
                if param.is_eager() {
                    if let Some(default) = param.default_value() {
                        values.insert(param.name(), default.clone());
                    }
                    continue;
                }
                if let Some(default) = param.default_value() {
                    debug!(param = param.name(), source = ?Source::Default, "resolved");
                    let value = normalize(param, default.clone());
                    match self.finish(param, value)? {
                        Step::Value(value) => values.insert(param.name(), value),
                        Step::Exit(message) => return Ok(Outcome::Exited(message)),
                    }
                    continue;
                }
                if param.is_required() && self.mode == Mode::Strict {
                    return Err(missing(param));
                }
                if param.is_multiple() {
                    values.insert(param.name(), Value::List(Vec::new()));
                }
                continue;
            };
            debug!(param = param.name(), source = ?source, "resolved");

            let value = match self.convert(param, &raw) {
                Ok(value) => value,
                Err(_) if self.mode == Mode::Resilient => continue,
                Err(failure) => return Err(failure),
            };
            match self.finish(param, value)? {
                Step::Value(value) => values.insert(param.name(), value),
                Step::Exit(message) => return Ok(Outcome::Exited(message)),
            }
        }

        Ok(Outcome::Resolved(values))
    }

    /// Token, then environment, then prompt. `None` means fall back to the default.
    fn lookup(
        &mut self,
        param: &ParameterSpec,
        matched: &[String],
    ) -> Result<Option<(Vec<String>, Source)>, Failure> {
        if !matched.is_empty() {
            return Ok(Some((matched.to_vec(), Source::Token)));
        }

        if let Some(var) = param.env_var() {
            if let Some(raw) = self.env.get(var).and_then(|v| split_raw(param, v)) {
                return Ok(Some((raw, Source::Env)));
            }
        }

        if self.mode == Mode::Strict && param.prompt_text().is_some() {
            if let Some(raw) = self.prompt(param)?.and_then(|a| split_raw(param, &a)) {
                return Ok(Some((raw, Source::Prompt)));
            }
        }

        Ok(None)
    }

    fn prompt(&mut self, param: &ParameterSpec) -> Result<Option<String>, Failure> {
        let Some(text) = param.prompt_text() else {
            return Ok(None);
        };
        let first_text = match param.default_value() {
            Some(default) if !param.is_hidden() => format!("{} [{}]: ", text, default),
            _ => format!("{}: ", text),
        };

        for attempt in 1..=self.confirm_attempts {
            let first = self.read(param, &first_text)?;
            if first.is_empty() {
                return Ok(None);
            }
            let Some(confirm) = param.confirm_prompt_text() else {
                return Ok(Some(first));
            };
            let second = self.read(param, &format!("{}: ", confirm))?;
            if first == second {
                return Ok(Some(first));
            }
            debug!(param = param.name(), attempt, "confirmation did not match");
        }

        Err(Failure::mismatched(param.name()))
    }

    fn read(&mut self, param: &ParameterSpec, text: &str) -> Result<String, Failure> {
        self.input
            .read(text, param.is_hidden())
            .map(|line| line.trim_end_matches(['\r', '\n']).to_string())
            .map_err(|e| {
                debug!(param = param.name(), error = %e, "prompt read failed");
                Failure::aborted(Some(param.name()), "Aborted!")
            })
    }

    fn convert(&self, param: &ParameterSpec, raw: &[String]) -> Result<Value, Failure> {
        let value_type = param.get_value_type();
        let parse = |s: &String| {
            value_type.parse(s).map_err(|reason| {
                Failure::invalid(
                    param.name(),
                    format!("Invalid value for {}: {}", param.label(), reason),
                )
            })
        };

        if param.is_multiple() {
            let items = raw.iter().map(parse).collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(items))
        } else {
            match raw.last() {
                Some(last) => parse(last),
                None => Err(missing(param)),
            }
        }
    }

    fn finish(&self, param: &ParameterSpec, value: Value) -> Result<Step, Failure> {
        if self.mode == Mode::Resilient {
            return Ok(Step::Value(value));
        }
        run_callback(param, value)
    }
}

enum Step {
    Value(Value),
    Exit(Option<String>),
}

fn run_callback(param: &ParameterSpec, value: Value) -> Result<Step, Failure> {
    let Some(callback) = param.get_callback() else {
        return Ok(Step::Value(value));
    };
    match callback(value) {
        Ok(Flow::Continue(value)) => Ok(Step::Value(value)),
        Ok(Flow::Exit(message)) => {
            debug!(param = param.name(), "callback requested exit");
            Ok(Step::Exit(message))
        }
        Err(abort) => Err(Failure::aborted(Some(param.name()), abort.message)),
    }
}

/// Resolves with a fresh [`Resolver`] in strict mode.
pub fn resolve(
    command: &CommandSpec,
    tokens: &[String],
    env: &HashMap<String, String>,
    input: &mut dyn InputSource,
) -> Result<Outcome, Failure> {
    Resolver::new(env, input).resolve(command, tokens)
}

fn missing(param: &ParameterSpec) -> Failure {
    let what = if param.is_positional() {
        "argument"
    } else {
        "option"
    };
    Failure::missing(param.name(), format!("Missing {} {}.", what, param.label()))
}

/// Raw values from an env var or prompt answer. Multiple-valued parameters
/// split on whitespace; `None` when nothing usable is left.
fn split_raw(param: &ParameterSpec, text: &str) -> Option<Vec<String>> {
    let raw: Vec<String> = if param.is_multiple() {
        text.split_whitespace().map(str::to_string).collect()
    } else if text.is_empty() {
        Vec::new()
    } else {
        vec![text.to_string()]
    };
    (!raw.is_empty()).then_some(raw)
}

/// Multiple-valued parameters always hold a list.
fn normalize(param: &ParameterSpec, value: Value) -> Value {
    match value {
        Value::List(_) => value,
        other if param.is_multiple() => Value::List(vec![other]),
        other => other,
    }
}

/// `-5` and `-.5` are values; `-nan` or `-inf` are not.
fn looks_like_flag(token: &str) -> bool {
    let mut chars = token.chars();
    if chars.next() != Some('-') {
        return false;
    }
    match chars.next() {
        None => false,
        Some(c) if c.is_ascii_digit() || c == '.' => token.parse::<f64>().is_err(),
        Some(_) => true,
    }
}

/// Assigns tokens to parameters. In resilient mode nothing fails: unknown
/// tokens land in `extra` and a trailing option without value is `dangling`.
pub(crate) fn match_tokens(
    command: &CommandSpec,
    tokens: &[String],
    mode: Mode,
) -> Result<Matched, Failure> {
    let params = command.params();
    let mut matched = Matched {
        raw: vec![Vec::new(); params.len()],
        ..Matched::default()
    };
    let strict = mode == Mode::Strict;
    let mut positional_tokens: Vec<String> = Vec::new();
    let mut options_done = false;
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        i += 1;

        if options_done || !looks_like_flag(token) {
            positional_tokens.push(token.clone());
            continue;
        }
        if token == "--" {
            options_done = true;
            continue;
        }

        if let Some(long) = token.strip_prefix("--") {
            let (flag, inline) = match long.split_once('=') {
                Some((flag, value)) => (format!("--{}", flag), Some(value.to_string())),
                None => (token.clone(), None),
            };
            let Some(idx) = find_flag(params, &flag) else {
                if strict {
                    return Err(Failure::unknown(token, format!("No such option: {}", flag)));
                }
                matched.extra.push(token.clone());
                continue;
            };
            let param = &params[idx];
            trace!(token = %token, param = param.name(), "matched long flag");

            if param.is_bool() {
                let negative = param.negative_flag().as_deref() == Some(flag.as_str());
                let raw = match (negative, inline) {
                    (false, None) => "true".to_string(),
                    (true, None) => "false".to_string(),
                    (false, Some(value)) => value,
                    (true, Some(_)) if strict => {
                        return Err(Failure::invalid(
                            param.name(),
                            format!("Option '{}' does not take a value.", flag),
                        ))
                    }
                    (true, Some(_)) => continue,
                };
                push_raw(&mut matched, param, idx, raw);
                continue;
            }

            let value = match inline {
                Some(value) => Some(value),
                None if i < tokens.len() => {
                    i += 1;
                    Some(tokens[i - 1].clone())
                }
                None => None,
            };
            match value {
                Some(value) => push_raw(&mut matched, param, idx, value),
                None if strict => return Err(needs_value(param, &flag)),
                None => matched.dangling = Some(idx),
            }
            continue;
        }

        // Short flags, possibly clustered: `-lv`, `-nAna`, `-n Ana`.
        let cluster: Vec<char> = token[1..].chars().collect();
        let mut pos = 0;
        while pos < cluster.len() {
            let flag = format!("-{}", cluster[pos]);
            pos += 1;
            let Some(idx) = find_flag(params, &flag) else {
                if strict {
                    return Err(Failure::unknown(token, format!("No such option: {}", flag)));
                }
                matched.extra.push(flag);
                continue;
            };
            let param = &params[idx];
            trace!(token = %token, param = param.name(), "matched short flag");

            if param.is_bool() {
                push_raw(&mut matched, param, idx, "true".to_string());
                continue;
            }

            let rest: String = cluster[pos..].iter().collect();
            pos = cluster.len();
            if !rest.is_empty() {
                push_raw(&mut matched, param, idx, rest);
            } else if i < tokens.len() {
                push_raw(&mut matched, param, idx, tokens[i].clone());
                i += 1;
            } else if strict {
                return Err(needs_value(param, &flag));
            } else {
                matched.dangling = Some(idx);
            }
        }
    }

    let mut leftover = positional_tokens.into_iter();
    for (idx, param) in params.iter().enumerate() {
        if !param.is_positional() {
            continue;
        }
        if param.is_multiple() {
            matched.raw[idx].extend(leftover.by_ref());
        } else if let Some(token) = leftover.next() {
            matched.raw[idx].push(token);
        }
    }

    let extra: Vec<String> = leftover.collect();
    if strict && !extra.is_empty() {
        let message = if extra.len() == 1 {
            format!("Got unexpected extra argument ({})", extra[0])
        } else {
            format!("Got unexpected extra arguments ({})", extra.join(" "))
        };
        return Err(Failure::unknown(&extra[0], message));
    }
    matched.extra.extend(extra);

    Ok(matched)
}

fn find_flag(params: &[ParameterSpec], flag: &str) -> Option<usize> {
    params
        .iter()
        .position(|p| p.flags().iter().any(|f| f == flag))
}

fn push_raw(matched: &mut Matched, param: &ParameterSpec, idx: usize, raw: String) {
    if !param.is_multiple() {
        matched.raw[idx].clear();
    }
    matched.raw[idx].push(raw);
}

fn needs_value(param: &ParameterSpec, flag: &str) -> Failure {
    Failure::invalid(
        param.name(),
        format!("Option '{}' requires an argument.", flag),
    )
}
