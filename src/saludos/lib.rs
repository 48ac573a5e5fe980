//! # Saludos Architecture
//!
//! Saludos is a handful of small demo commands sitting on a **declarative
//! command resolver**. The demos are glue; the resolver is the library.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Global flags via clap, logging, exit codes               │
//! │  - Registers the demo commands and their bodies             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Dispatcher (app.rs)                                        │
//! │  - Command registry, `--help` injection, body invocation    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Resolver (resolver.rs)                                     │
//! │  - tokens + environment + prompts → typed values            │
//! │  - eager short-circuit, callbacks, resilient mode           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Declaring a command
//!
//! ```rust
//! use saludos::prelude::*;
//! use std::collections::HashMap;
//!
//! let app = App::new("demo")
//!     .command(
//!         CommandSpec::new("greet")
//!             .param(ParameterSpec::argument("name").env("NAME"))
//!             .param(ParameterSpec::flag("loud").short('l')),
//!     )
//!     .unwrap();
//!
//! let env = HashMap::from([("NAME".to_string(), "Luz".to_string())]);
//! let mut input = ScriptedInput::empty();
//! let outcome = resolve(&app.commands()[0], &[], &env, &mut input).unwrap();
//! match outcome {
//!     Outcome::Resolved(args) => assert_eq!(args.get_str("name"), Some("Luz")),
//!     Outcome::Exited(_) => unreachable!(),
//! }
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! Nothing outside `prompt.rs` touches the terminal. Help and failures are
//! rendered to strings; the binary decides where they go and which exit code
//! follows.
//!
//! ## Module Overview
//!
//! - [`resolver`]: the resolution pipeline and its modes
//! - [`app`]: command registry and dispatch
//! - [`param`], [`command`]: declarative specs
//! - [`value`], [`args`]: typed values and resolved argument sets
//! - [`prompt`]: interactive input sources
//! - [`help`]: styled help and failure rendering
//! - [`complete`]: shell completion candidates
//! - [`config`]: configuration file
//! - [`error`]: error types

pub mod app;
pub mod args;
pub mod command;
pub mod complete;
pub mod config;
pub mod error;
pub mod help;
pub mod param;
pub mod prompt;
pub mod resolver;
pub mod value;

pub mod prelude {
    pub use crate::app::{App, Dispatch};
    pub use crate::args::ResolvedArgs;
    pub use crate::command::CommandSpec;
    pub use crate::error::{Abort, Failure, FailureKind};
    pub use crate::param::{Flow, ParameterSpec};
    pub use crate::prompt::{InputSource, ScriptedInput};
    pub use crate::resolver::{resolve, Mode, Outcome, Resolver};
    pub use crate::value::{Value, ValueType};
}
