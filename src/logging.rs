use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_ENV: &str = "FLASHDECK_LOG";

/// Keeps the background log writer alive; drop it last to flush.
pub struct LogGuard {
    _guard: WorkerGuard,
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose { "flashdeck=debug" } else { "flashdeck=info" }
}

/// Sends tracing output to `log_file`. The terminal is left to the TUI.
pub fn init_logging(log_file: &Path, verbose: bool) -> Result<LogGuard> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .context("Failed to install the log subscriber")?;

    Ok(LogGuard { _guard: guard })
}
