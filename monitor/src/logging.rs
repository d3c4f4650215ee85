//! Logging initialization.
//!
//! Filter resolution: `RUST_LOG`, then `HEALTHDASH_LOG_LEVEL`, then `info`.
//! When `HEALTHDASH_LOG_DIR` is set, logs are also written to a daily rolling
//! file in that directory.

use crate::error::{MonitorError, MonitorResult};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_LEVEL_ENV: &str = "HEALTHDASH_LOG_LEVEL";
const LOG_DIR_ENV: &str = "HEALTHDASH_LOG_DIR";
const LOG_FILE_PREFIX: &str = "healthdash.log";

/// Resolve the filter directive used when `RUST_LOG` is absent.
fn default_directive() -> String {
    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .filter(|level| !level.trim().is_empty())
        .unwrap_or_else(|| "info".to_string())
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// lifetime of the process.
pub fn init() -> MonitorResult<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive()))
        .map_err(|e| MonitorError::Logging(e.to_string()))?;

    let (file_layer, guard) = match std::env::var(LOG_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| MonitorError::Logging(e.to_string()))?;

    Ok(guard)
}
