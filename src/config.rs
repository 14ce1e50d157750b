use std::time::Duration;

/// SQLite file the intake service writes to.
pub const DEFAULT_DATABASE: &str = "orders.db";

/// Address the intake service listens on.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";

/// Orders endpoint used by the dashboard and the generator.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/orders";

/// Seconds between two generated orders.
pub const DEFAULT_GENERATOR_INTERVAL_SECS: u64 = 3;

/// Per-request timeout of the HTTP clients.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "fleetlytics=debug,tower_http=debug"
    } else {
        "fleetlytics=info,tower_http=info"
    }
}
