//! Tracing subscriber setup

use crate::config::{DaemonConfig, LogFormat};
use anyhow::{anyhow, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "roster=info";
const LOG_FILE_PREFIX: &str = "roster.log";

/// Install the global subscriber.
///
/// The returned guard flushes the file writer; keep it alive until exit.
pub fn init(config: &DaemonConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| anyhow!("Failed to create env filter: {}", e))?;

    // Production: JSON structured logging. Development: pretty with colors.
    let json = (config.log_format == LogFormat::Json).then(|| fmt::layer().json());
    let pretty = (config.log_format == LogFormat::Pretty).then(|| fmt::layer().pretty());

    let (file, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json)
        .with(pretty)
        .with(file)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(guard)
}
