//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the process.
///
/// Filtering comes from `RUST_LOG` (default `info`). `SURTIDO_LOG_FORMAT`
/// selects the formatter: `json` (default, what the dashboard's log
/// shipper expects) or `compact` for local runs. Safe to call multiple
/// times; subsequent calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let format = std::env::var("SURTIDO_LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let _ = match format.as_str() {
        "compact" => builder.compact().try_init(),
        _ => builder.json().try_init(),
    };
}
