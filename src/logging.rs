//! Logging setup: tracing events to stderr, filtered by RUST_LOG or the verbose flag.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Initialize the tracing subscriber. RUST_LOG wins over the verbosity flag.
/// Logs go to stderr so stdout stays free for command output.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);

    // A second init (tests, embedding) keeps the first subscriber
    let _ = Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
