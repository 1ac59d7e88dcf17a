//! Shared helpers for the examples.

#![allow(dead_code)]

/// Port used by both examples unless `SELLSIDE_PORT` says otherwise.
pub const DEFAULT_PORT: u16 = 9878;

/// Initialize logging.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

/// Reads an environment variable, falling back to `default`.
pub fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
