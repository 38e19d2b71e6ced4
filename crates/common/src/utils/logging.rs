use std::io;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,sqlx=warn";

fn env_filter(fallback: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback.unwrap_or(DEFAULT_FILTER)))
}

/// Initialize tracing with an explicit format and fallback filter.
/// - Respects `RUST_LOG` if set, otherwise `fallback_filter`, otherwise `info,sqlx=warn`
/// - Writes to stdout to improve visibility in environments that hide stderr
///
/// Repeated calls are no-ops once a global subscriber is installed.
pub fn init_logging(json: bool, fallback_filter: Option<&str>) {
    let filter = env_filter(fallback_filter);
    let _ = if json {
        fmt().with_env_filter(filter).with_target(true).json().with_writer(io::stdout).try_init()
    } else {
        fmt().with_env_filter(filter).with_target(true).compact().with_writer(io::stdout).try_init()
    };
}
