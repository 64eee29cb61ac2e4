//! Logging setup built on tracing-subscriber

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence when set; otherwise the filter defaults to
/// `fasthttp=info`, or `fasthttp=debug` when `debug` is enabled. Safe to call
/// more than once: a subscriber installed elsewhere is left in place.
pub fn init(debug: bool) {
    let default_filter = if debug { "fasthttp=debug" } else { "fasthttp=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
