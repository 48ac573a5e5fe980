//! # Saludos CLI
//!
//! The binary is intentionally thin: everything lives in `cli/`, and this
//! file only turns the result of `cli::run()` into a process exit status.
//! The library never exits the process; the exit code comes back as a value.

mod cli;

fn main() {
    match cli::run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
