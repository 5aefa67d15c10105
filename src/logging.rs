use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;
use crate::error::{Error, Result};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_level`. Calling this twice is not an error:
/// the first subscriber stays in place.
pub fn init(default_level: &str, format: LogFormat) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level).map_err(|e| Error::Logging(e.to_string()))?,
    };

    let result = match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .with_target(true)
            .with_thread_ids(true)
            .try_init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };

    match result {
        Ok(()) => tracing::info!(filter = default_level, ?format, "logging initialized"),
        Err(_) => tracing::debug!("global subscriber already set, keeping it"),
    }

    Ok(())
}
