use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "POMODOER_LOG";

pub fn default_log_dir() -> PathBuf {
    ProjectDirs::from("", "", "pomodoer")
        .map(|pd| pd.data_local_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("pomodoer-logs"))
}

/// Send tracing output to a file in `dir`; the terminal belongs to the UI.
///
/// Returns `None` when the log file can't be set up. Keep the guard alive
/// until exit so buffered lines get flushed.
pub fn init(dir: &Path) -> Option<WorkerGuard> {
    fs::create_dir_all(dir).ok()?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("pomodoer")
        .filename_suffix("log")
        .build(dir)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}
