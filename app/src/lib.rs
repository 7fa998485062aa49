pub mod cli;
pub mod console;

use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout stays reserved for prompts and answers.
/// `RUST_LOG` wins over the command-line default.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
