use crate::Result;
use std::env;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` controls the filter (`info` when unset), `ZONEMAP_LOG_FORMAT=json`
/// switches to JSON lines. Fails if a subscriber is already installed.
pub fn init() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("ZONEMAP_LOG_FORMAT")
        .map(|it| it.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let res = if json {
        builder.json().try_init()
    } else {
        builder.without_time().try_init()
    };
    res.map_err(|e| format!("Failed to init logging: {e}").into())
}
