use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::config::{self, LoggingSettings};

/// Initialize file logging for the TUI.
///
/// Logs go to a daily-rolled file only; the terminal belongs to ratatui.
/// `RUST_LOG` overrides the configured level. The returned guard must be
/// held until exit so buffered lines are flushed.
pub fn init(settings: &LoggingSettings) -> Option<WorkerGuard> {
    let log_dir = settings
        .directory
        .clone()
        .or_else(config::default_log_dir)
        .unwrap_or_else(|| PathBuf::from("logs"));

    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("lectern: failed to create log directory {}: {e}", log_dir.display());
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, "lectern.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_filter(env_filter);

    // No stdout layer
    if tracing_subscriber::registry().with(file_layer).try_init().is_err() {
        return None;
    }

    tracing::info!(dir = %log_dir.display(), "logging initialized");
    Some(guard)
}
