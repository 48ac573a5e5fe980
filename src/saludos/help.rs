//! # Help and failure rendering
//!
//! Help pages are minijinja templates styled through a `style` filter that
//! looks names up in [`HELP_THEME`]. Layout (column widths, padding) is done
//! in Rust because it needs Unicode-aware widths; templates only decide what
//! gets which style.
//!
//! Every render function takes `use_color`. Callers pass
//! `console::colors_enabled()` (or the stderr variant), so `--no-color`,
//! `NO_COLOR` and piped output all end up as plain text.

use crate::command::CommandSpec;
use crate::error::{Failure, FailureKind, Result};
use crate::param::ParameterSpec;
use console::Style;
use minijinja::{Environment, Value as TemplateValue};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use unicode_width::UnicodeWidthStr;

pub static HELP_THEME: Lazy<HashMap<&'static str, Style>> = Lazy::new(|| {
    HashMap::from([
        ("heading", Style::new().bold()),
        ("usage", Style::new().yellow()),
        ("flag", Style::new().cyan().bold()),
        ("command", Style::new().cyan().bold()),
        ("meta", Style::new().dim()),
        ("required", Style::new().red()),
        ("error", Style::new().red().bold()),
    ])
});

const COMMAND_TEMPLATE: &str = r#"{{ "Usage:" | style("heading") }} {{ usage | style("usage") }}
{% if about %}

  {{ about }}
{% endif %}
{% for panel in panels %}

{{ panel.title | style("heading") }}
{% for row in panel.rows %}
  {{ row.left | style("flag") }}{{ row.gap }}{{ row.help }}{{ row.notes | style("meta") }}{{ row.required | style("required") }}
{% endfor %}
{% endfor %}
"#;

const APP_TEMPLATE: &str = r#"{{ "Usage:" | style("heading") }} {{ usage | style("usage") }}
{% if about %}

  {{ about }}
{% endif %}
{% if options %}

{{ "Options" | style("heading") }}
{% for row in options %}
  {{ row.left | style("flag") }}{{ row.gap }}{{ row.help }}
{% endfor %}
{% endif %}

{{ "Commands" | style("heading") }}
{% for row in commands %}
  {{ row.left | style("command") }}{{ row.gap }}{{ row.help }}
{% endfor %}
"#;

const FAILURE_TEMPLATE: &str = r#"{% if usage %}
{{ "Usage:" | style("heading") }} {{ usage | style("usage") }}
{{ hint | style("meta") }}

{% endif %}
{{ "Error:" | style("error") }} {{ message }}
"#;

const GAP: usize = 2;

#[derive(Serialize)]
struct Row {
    left: String,
    gap: String,
    help: String,
    notes: String,
    required: String,
}

#[derive(Serialize)]
struct Panel {
    title: String,
    rows: Vec<Row>,
}

#[derive(Serialize)]
struct CommandPage<'a> {
    usage: String,
    about: Option<&'a str>,
    panels: Vec<Panel>,
}

#[derive(Serialize)]
struct AppPage<'a> {
    usage: String,
    about: Option<&'a str>,
    options: Vec<Row>,
    commands: Vec<Row>,
}

#[derive(Serialize)]
struct FailurePage<'a> {
    usage: Option<String>,
    hint: String,
    message: &'a str,
}

fn environment(use_color: bool) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_filter("style", move |value: TemplateValue, name: String| -> String {
        let text = value.to_string();
        if text.is_empty() || !use_color {
            return text;
        }
        match HELP_THEME.get(name.as_str()) {
            Some(style) => style.clone().force_styling(true).apply_to(text).to_string(),
            None => text,
        }
    });
    env
}

fn render<T: Serialize>(template: &str, data: &T, use_color: bool) -> Result<String> {
    let env = environment(use_color);
    Ok(env.render_str(template, data)?)
}

/// `app cmd [OPTIONS] NAME [EXTRA]...`
pub fn usage_line(app_name: &str, command: &CommandSpec) -> String {
    let mut parts = vec![app_name.to_string(), command.name().to_string()];
    if command.named().next().is_some() {
        parts.push("[OPTIONS]".to_string());
    }
    for param in command.positionals() {
        let metavar = param.display_metavar();
        if param.is_required() {
            parts.push(metavar);
        } else {
            parts.push(format!("[{}]", metavar));
        }
    }
    parts.join(" ")
}

fn left_column(param: &ParameterSpec) -> String {
    if param.is_positional() {
        return param.display_metavar();
    }
    let mut flags: Vec<String> = Vec::new();
    if let Some(short) = param.short_flag() {
        flags.push(short);
    }
    match (param.long_flag(), param.negative_flag()) {
        (Some(long), Some(negative)) => flags.push(format!("{} / {}", long, negative)),
        (Some(long), None) => flags.push(long),
        _ => {}
    }
    let mut left = flags.join(", ");
    if !param.is_bool() {
        left.push(' ');
        left.push_str(&param.display_metavar());
    }
    left
}

fn notes(param: &ParameterSpec) -> String {
    let mut notes = String::new();
    if let Some(var) = param.env_var() {
        notes.push_str(&format!(" [env var: {}]", var));
    }
    if let Some(default) = param.default_value() {
        if !param.is_eager() && !param.is_hidden() {
            notes.push_str(&format!(" [default: {}]", default));
        }
    }
    notes
}

/// Pads the left column of every row to the widest one.
fn align(rows: &mut [Row]) {
    let width = rows.iter().map(|r| r.left.width()).max().unwrap_or(0);
    for row in rows.iter_mut() {
        row.gap = " ".repeat(width - row.left.width() + GAP);
    }
}

pub fn render_command_help(app_name: &str, command: &CommandSpec, use_color: bool) -> Result<String> {
    let mut panels: Vec<Panel> = Vec::new();
    for param in command.params() {
        let row = Row {
            left: left_column(param),
            gap: String::new(),
            help: param.help_text().unwrap_or_default().to_string(),
            notes: notes(param),
            required: if param.is_required() {
                " [required]".to_string()
            } else {
                String::new()
            },
        };
        match panels.iter_mut().find(|p| p.title == param.panel()) {
            Some(panel) => panel.rows.push(row),
            None => panels.push(Panel {
                title: param.panel().to_string(),
                rows: vec![row],
            }),
        }
    }
    for panel in panels.iter_mut() {
        align(&mut panel.rows);
    }

    let page = CommandPage {
        usage: usage_line(app_name, command),
        about: command.about_text(),
        panels,
    };
    render(COMMAND_TEMPLATE, &page, use_color)
}

/// Top-level help. `options` are the program-wide flags as (flags, help) pairs.
pub fn render_app_help(
    app_name: &str,
    about: Option<&str>,
    commands: &[CommandSpec],
    options: &[(String, String)],
    use_color: bool,
) -> Result<String> {
    let mut option_rows: Vec<Row> = options
        .iter()
        .map(|(left, help)| plain_row(left, help))
        .collect();
    align(&mut option_rows);

    let mut command_rows: Vec<Row> = commands
        .iter()
        .map(|c| plain_row(c.name(), first_line(c.about_text().unwrap_or_default())))
        .collect();
    align(&mut command_rows);

    let page = AppPage {
        usage: format!("{} [OPTIONS] COMMAND [ARGS]...", app_name),
        about,
        options: option_rows,
        commands: command_rows,
    };
    render(APP_TEMPLATE, &page, use_color)
}

/// Usage failures get the usage line and a help hint; aborts only the message.
pub fn render_failure(
    app_name: &str,
    command: Option<&CommandSpec>,
    failure: &Failure,
    use_color: bool,
) -> Result<String> {
    let usage = match (failure.kind, command) {
        (FailureKind::AbortedByCallback, _) => None,
        (_, Some(command)) => Some(usage_line(app_name, command)),
        (_, None) => Some(format!("{} [OPTIONS] COMMAND [ARGS]...", app_name)),
    };
    let hint = match command {
        Some(command) => format!("Try '{} {} --help' for help.", app_name, command.name()),
        None => format!("Try '{} --help' for help.", app_name),
    };
    let page = FailurePage {
        usage,
        hint,
        message: &failure.message,
    };
    render(FAILURE_TEMPLATE, &page, use_color)
}

fn plain_row(left: &str, help: &str) -> Row {
    Row {
        left: left.to_string(),
        gap: String::new(),
        help: help.to_string(),
        notes: String::new(),
        required: String::new(),
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
