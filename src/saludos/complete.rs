//! Shell completion candidates.
//!
//! The words typed so far are resolved in [`Mode::Resilient`], so callbacks
//! with side effects never fire and prompts never block, then the word under
//! the cursor is matched against command names, flags or the choices of the
//! parameter it belongs to.

use crate::app::App;
use crate::args::ResolvedArgs;
use crate::command::CommandSpec;
use crate::param::ParameterSpec;
use crate::prompt::ScriptedInput;
use crate::resolver::{match_tokens, Mode, Outcome, Resolver};
use std::collections::HashMap;
use tracing::trace;

/// `words` are the arguments after the program name; the last one is the
/// word being completed (possibly empty).
pub fn complete(app: &App, words: &[String], env: &HashMap<String, String>) -> Vec<String> {
    let Some((incomplete, before)) = words.split_last() else {
        return command_names(app, "");
    };
    let Some((name, typed)) = before.split_first() else {
        return command_names(app, incomplete);
    };
    let Some(command) = app.find(name) else {
        return Vec::new();
    };
    trace!(command = command.name(), incomplete = %incomplete, "completing");
    complete_command(command, typed, incomplete, env)
}

fn command_names(app: &App, prefix: &str) -> Vec<String> {
    app.commands()
        .iter()
        .map(|c| c.name().to_string())
        .filter(|n| n.starts_with(prefix))
        .collect()
}

fn complete_command(
    command: &CommandSpec,
    typed: &[String],
    incomplete: &str,
    env: &HashMap<String, String>,
) -> Vec<String> {
    let Ok(matched) = match_tokens(command, typed, Mode::Resilient) else {
        return Vec::new();
    };
    let partial = partial_values(command, typed, env);
    let params = command.params();

    if let Some(idx) = matched.dangling {
        return choices(&params[idx], &partial, incomplete);
    }

    if let Some(flag_part) = incomplete.strip_prefix("--") {
        if let Some((flag, value)) = flag_part.split_once('=') {
            let flag = format!("--{}", flag);
            return params
                .iter()
                .find(|p| p.long_flag().as_deref() == Some(flag.as_str()))
                .map(|p| {
                    choices(p, &partial, value)
                        .into_iter()
                        .map(|c| format!("{}={}", flag, c))
                        .collect()
                })
                .unwrap_or_default();
        }
    }

    if incomplete.starts_with('-') {
        return params
            .iter()
            .enumerate()
            .filter(|(idx, p)| !p.is_positional() && (p.is_multiple() || matched.raw[*idx].is_empty()))
            .flat_map(|(_, p)| p.flags())
            .filter(|f| f.starts_with(incomplete))
            .collect();
    }

    let next = params.iter().enumerate().find(|(idx, p)| {
        p.is_positional() && (p.is_multiple() || matched.raw[*idx].is_empty())
    });
    match next {
        Some((_, param)) => choices(param, &partial, incomplete),
        None => Vec::new(),
    }
}

fn partial_values(command: &CommandSpec, typed: &[String], env: &HashMap<String, String>) -> ResolvedArgs {
    let mut input = ScriptedInput::empty();
    let outcome = Resolver::new(env, &mut input)
        .with_mode(Mode::Resilient)
        .resolve(command, typed);
    match outcome {
        Ok(Outcome::Resolved(values)) => values,
        _ => ResolvedArgs::new(),
    }
}

fn choices(param: &ParameterSpec, partial: &ResolvedArgs, incomplete: &str) -> Vec<String> {
    match param.get_choices() {
        Some(provider) => provider(partial, incomplete)
            .into_iter()
            .filter(|c| c.starts_with(incomplete))
            .collect(),
        None => Vec::new(),
    }
}
