use clap::{ArgAction, Parser, Subcommand, ValueEnum};

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
}

/// Returns the version string, including the git hash for non-release builds.
/// Format: "0.1.0" for releases, "0.1.0@abc1234" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "saludos",
    bin_name = "saludos",
    version = get_version(),
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Pequeños comandos de ejemplo", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Invocation>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print help
    #[arg(short, long)]
    pub help: bool,
}

#[derive(Subcommand, Debug)]
pub enum Invocation {
    /// Generate shell completions
    #[command(hide = true)]
    Completions {
        #[arg(value_enum)]
        shell: CompletionShell,
    },

    /// Print completion candidates for the words after `--` (hidden)
    #[command(hide = true, name = "__complete")]
    Complete {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },

    /// Any demo command, resolved by the library
    #[command(external_subcommand)]
    Script(Vec<String>),
}

/// Program-wide flags as shown in the top-level help.
pub fn global_options() -> Vec<(String, String)> {
    vec![
        ("--no-color".to_string(), "Disable colored output".to_string()),
        (
            "-v, --verbose".to_string(),
            "More log output (-v info, -vv debug, -vvv trace)".to_string(),
        ),
        ("-h, --help".to_string(), "Print help".to_string()),
        ("-V, --version".to_string(), "Print version".to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_command_keeps_its_flags() {
        let cli = Cli::try_parse_from(["saludos", "-v", "despedida", "Ana", "--formal"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Some(Invocation::Script(tokens)) => {
                assert_eq!(tokens, vec!["despedida", "Ana", "--formal"])
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_complete_accepts_hyphen_words() {
        let cli = Cli::try_parse_from(["saludos", "__complete", "--", "registro", "--"]).unwrap();
        match cli.command {
            Some(Invocation::Complete { words }) => assert_eq!(words, vec!["registro", "--"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_help_flag_is_ours() {
        let cli = Cli::try_parse_from(["saludos", "--help"]).unwrap();
        assert!(cli.help);
        assert!(cli.command.is_none());
    }
}
