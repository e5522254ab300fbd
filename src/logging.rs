use tracing_subscriber::EnvFilter;

/// Env var holding an `EnvFilter` directive, e.g. `TEMPO_BALANCE_LOG=debug`.
pub const LOG_ENV: &str = "TEMPO_BALANCE_LOG";

fn default_directive(debug: bool) -> &'static str {
    if debug { "debug" } else { "info" }
}

/// Install the stderr subscriber. Status lines go to stderr so stdout only carries the result.
pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
