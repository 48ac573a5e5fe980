//! `run()` turns the clap-parsed surface into one of four handlers:
//! top-level help, the completion helpers, or a demo command resolved by
//! the library. Every handler returns the process exit code.

use super::logging::init_logging;
use super::scripts::build_app;
use super::setup::{global_options, Cli, CompletionShell, Invocation};
use clap::Parser;
use colored::Colorize;
use saludos::app::{App, Dispatch};
use saludos::complete::complete;
use saludos::config::{config_dir, AppConfig, ColorChoice};
use saludos::error::{Failure, Result};
use saludos::help::{render_app_help, render_failure};
use saludos::prompt::{InputSource, StdinInput, TerminalInput};
use std::collections::HashMap;
use std::io::IsTerminal;
use tracing::{debug, warn};

const BASH_COMPLETION_SCRIPT: &str = include_str!("bash.completion.sh");
const ZSH_COMPLETION_SCRIPT: &str = include_str!("z-completion.sh");

struct AppContext {
    app: App,
    env: HashMap<String, String>,
}

pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let env: HashMap<String, String> = std::env::vars().collect();
    let config = load_config(&env);
    apply_color(&cli, &config, &env);

    let ctx = AppContext {
        app: build_app(&config)?,
        env,
    };

    if cli.help {
        return handle_app_help(&ctx);
    }

    match cli.command {
        None => handle_failure(&ctx, None, &Failure::missing("COMMAND", "Missing command.")),
        Some(Invocation::Completions { shell }) => Ok(handle_completions(shell)),
        Some(Invocation::Complete { words }) => Ok(handle_complete(&ctx, &words)),
        Some(Invocation::Script(tokens)) => handle_script(&ctx, &tokens),
    }
}

/// A broken config file should not make every command unusable.
fn load_config(env: &HashMap<String, String>) -> AppConfig {
    let loaded = config_dir(env).and_then(|dir| {
        debug!(dir = %dir.display(), "loading config");
        AppConfig::load(dir)
    });
    match loaded {
        Ok(config) => config,
        Err(e) => {
            warn!("using default config: {}", e);
            AppConfig::default()
        }
    }
}

fn apply_color(cli: &Cli, config: &AppConfig, env: &HashMap<String, String>) {
    let enabled = if cli.no_color || env.contains_key("NO_COLOR") {
        Some(false)
    } else {
        match config.color {
            ColorChoice::Always => Some(true),
            ColorChoice::Never => Some(false),
            ColorChoice::Auto => None,
        }
    };

    if let Some(enabled) = enabled {
        console::set_colors_enabled(enabled);
        console::set_colors_enabled_stderr(enabled);
        colored::control::set_override(enabled);
    }
}

fn handle_app_help(ctx: &AppContext) -> Result<i32> {
    let text = render_app_help(
        ctx.app.name(),
        ctx.app.about_text(),
        ctx.app.commands(),
        &global_options(),
        console::colors_enabled(),
    )?;
    print!("{}", text);
    Ok(0)
}

fn handle_completions(shell: CompletionShell) -> i32 {
    match shell {
        CompletionShell::Bash => print!("{}", BASH_COMPLETION_SCRIPT),
        CompletionShell::Zsh => print!("{}", ZSH_COMPLETION_SCRIPT),
    }
    0
}

fn handle_complete(ctx: &AppContext, words: &[String]) -> i32 {
    for candidate in complete(&ctx.app, words, &ctx.env) {
        println!("{}", candidate);
    }
    0
}

fn handle_script(ctx: &AppContext, tokens: &[String]) -> Result<i32> {
    let mut terminal = TerminalInput::new();
    let mut piped = StdinInput;
    let input: &mut dyn InputSource =
        if use_terminal(std::io::stdin().is_terminal(), terminal.is_term()) {
            &mut terminal
        } else {
            debug!("prompts read from stdin");
            &mut piped
        };

    match ctx.app.dispatch(tokens, &ctx.env, input) {
        Ok(Dispatch::Ran) => Ok(0),
        Ok(Dispatch::Exited(message)) => {
            if let Some(message) = message {
                print!("{}", message);
                if !message.ends_with('\n') {
                    println!();
                }
            }
            Ok(0)
        }
        Ok(Dispatch::Aborted(abort)) => {
            eprintln!("{}", abort.message.red());
            Ok(1)
        }
        Err(failure) => {
            let command = tokens.first().and_then(|name| ctx.app.find(name));
            handle_failure(ctx, command, &failure)
        }
    }
}

/// Interactive reads need stdin and the prompt terminal (stderr) both
/// attached; `saludos registro 2>log` falls back to plain stdin lines.
fn use_terminal(stdin_is_tty: bool, prompt_is_tty: bool) -> bool {
    stdin_is_tty && prompt_is_tty
}

fn handle_failure(
    ctx: &AppContext,
    command: Option<&saludos::command::CommandSpec>,
    failure: &Failure,
) -> Result<i32> {
    debug!(kind = %failure.kind, "command failed");
    let text = render_failure(
        ctx.app.name(),
        command,
        failure,
        console::colors_enabled_stderr(),
    )?;
    eprint!("{}", text);
    Ok(failure.kind.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_input_needs_both_ends() {
        assert!(use_terminal(true, true));
        assert!(!use_terminal(true, false));
        assert!(!use_terminal(false, true));
        assert!(!use_terminal(false, false));
    }
}
