use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Level comes from `RUST_LOG`, default
/// `info`. Logs go to stderr so stdout carries only frame records.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .try_init();
}
