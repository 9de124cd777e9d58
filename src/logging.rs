//! Logging setup for the canopy CLI.
//!
//! Console output is filtered through `RUST_LOG` (default `info`); everything
//! also lands in a daily-rolling file under the platform data directory so
//! failed runs can be inspected after the fact.
//!
//! ```no_run
//! canopy::logging::init().expect("Failed to initialize logging");
//! tracing::info!("session started");
//! ```

use crate::error::{CanopyError, Result, ResultExt as _};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Platform log directory (`<data_dir>/canopy/logs`), created on demand.
///
/// - Windows: `%APPDATA%/canopy/logs`
/// - macOS: `~/Library/Application Support/canopy/logs`
/// - Linux: `~/.local/share/canopy/logs`
pub fn log_dir() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .ok_or_else(|| CanopyError::Other("Failed to determine data directory".to_owned()))?;

    let dir = base.join("canopy").join("logs");
    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    }

    Ok(dir)
}

/// Initialize console and rolling-file logging. Call once at startup.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the file
/// appender fails to build.
pub fn init() -> Result<()> {
    let dir = log_dir()?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(10)
        .filename_prefix("canopy")
        .filename_suffix("log")
        .build(&dir)
        .map_err(|e| CanopyError::Other(format!("Failed to create log file appender: {e}")))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer().with_target(true);
    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(file_appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::debug!("logging initialized, log directory: {}", dir.display());

    Ok(())
}
