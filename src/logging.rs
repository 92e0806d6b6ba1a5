use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use std::io::IsTerminal;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::models::LogSettings;

/// Prefix for rotated log files
pub const LOG_PREFIX: &str = "vault-export";

/// Create the log directory if it doesn't exist.
pub fn prepare_log_dir(log_dir: &Utf8Path) -> Result<()> {
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }
    Ok(())
}

/// Setup logging with console output and an optional rotating file appender.
///
/// The console layer writes to stderr so stdout only carries the plan and the
/// summary. When `settings.log_dir` is set, logs are also written there with
/// daily rotation.
///
/// # Returns
/// A guard that must be held for the duration of the program to keep file
/// logging active, or `None` when logging to the console only
pub fn setup_logging(settings: &LogSettings) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::new(settings.level.directive());

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time();

    let (file_layer, guard) = match &settings.log_dir {
        Some(log_dir) => {
            prepare_log_dir(log_dir)?;

            // Create daily rotating file appender
            let file_appender = rolling::daily(log_dir, LOG_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false) // No ANSI codes in log files
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true);

            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    tracing::debug!(
        "Logging initialized: level={}, dir={:?}",
        settings.level.directive(),
        settings.log_dir
    );

    Ok(guard)
}
