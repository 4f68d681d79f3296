//! Logging setup for the Coin Dash binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Both the server library crate and the binary log at `default_log_level`,
/// along with `tower_http` so request traces are visible. `RUST_LOG` overrides
/// the whole filter.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "coin_dash_server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use coin_dash_shared::logger::setup_logger;
///
/// setup_logger("coin_dash_server", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "coin_dash_server={level},{binary}={level},tower_http={level}",
        level = default_log_level,
        binary = binary_name.replace('-', "_"),
    )
}
