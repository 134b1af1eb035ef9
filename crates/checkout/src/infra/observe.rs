//! Tracing initialization shared between the binary and tests.

use {std::sync::Once, tracing_subscriber::EnvFilter};

/// Initializes the global tracing subscriber. `env_filter` uses the usual
/// `tracing_subscriber::EnvFilter` syntax.
pub fn init(env_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .init();
}

/// Like [`init`], but can be called multiple times in a row. Later calls are
/// ignored. Useful for tests.
pub fn init_reentrant(env_filter: &str) {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| init(env_filter));
}
