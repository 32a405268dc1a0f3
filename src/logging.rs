//! Tracing subscriber setup shared by both binaries.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file name for a run started at `now`.
pub fn log_file_name(now: chrono::DateTime<chrono::Local>) -> String {
    format!("{}.log", now.format("%S%M%H%d%m%Y"))
}

/// Install the global subscriber: stdout always, plus a plain-text file under
/// `log_dir` when given. Verbosity comes from `LOG_LEVEL`, INFO by default.
///
/// Returns the log file path, if any.
pub fn init_logging(log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let (file_layer, log_path) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {:?}", dir))?;
            let path = dir.join(log_file_name(chrono::Local::now()));
            let file = File::create(&path)
                .with_context(|| format!("Failed to create log file: {:?}", path))?;
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(log_path)
}
