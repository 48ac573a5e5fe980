//! # CLI Behavior
//!
//! This is the terminal client for the saludos library. It is the only
//! place that knows about stdout/stderr, exit codes and the real process
//! environment.
//!
//! ## Two parsers, on purpose
//!
//! clap owns the program-wide surface: `--no-color`, `-v`, `--help`,
//! `--version` and the hidden completion helpers. Anything after the first
//! non-flag word is handed untouched to the library's [`saludos::app::App`],
//! which resolves it against the registered demo commands.
//!
//! ## Exit codes
//!
//! - `0`: the command ran, or an eager option (`--help`) stopped it
//! - `1`: a callback or command body aborted, or an internal error
//! - `2`: a usage failure (missing, unknown or invalid values, confirmation mismatch)
//!
//! ## Module Structure
//!
//! - `setup`: clap definitions and the version string
//! - `commands`: dispatch from parsed flags to handlers
//! - `scripts`: the demo commands (`saludo`, `despedida`, `usuarios`, `scrapy`, `lanzar`, `registro`)
//! - `launch`: opening files with the platform viewer
//! - `logging`: tracing subscriber setup

mod commands;
mod launch;
mod logging;
mod scripts;
pub mod setup;

pub use commands::run;
