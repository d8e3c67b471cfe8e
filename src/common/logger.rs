use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::configs::LoggingConfig;

/// Install the global tracing subscriber. The embedder calls this once at
/// startup; `RUST_LOG` overrides the configured filter when set.
pub fn init(config: Option<&LoggingConfig>) {
    let level = config
        .and_then(|l| l.level.as_deref())
        .unwrap_or("info");
    let filters = config
        .and_then(|l| l.filters.as_deref())
        .unwrap_or("");

    let filter_str = if filters.is_empty() {
        level.to_string()
    } else {
        format!("{},{}", level, filters)
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .init();
}
