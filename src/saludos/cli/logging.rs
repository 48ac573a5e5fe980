use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SALUDOS_LOG";

fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Logs go to stderr so they never mix with command output.
/// `SALUDOS_LOG` (then `RUST_LOG`) overrides the `-v` level.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .without_time()
        .try_init();

    if let Err(e) = result {
        eprintln!("Log system initialization failed: {e}");
    }
}
