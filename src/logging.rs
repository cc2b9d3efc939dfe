use std::env;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "logs/autotorrent-index.log";
const DEFAULT_LEVEL: &str = "info";

/// Install the stdout and rolling-file subscribers.
///
/// `TRACING_LEVEL` takes an `EnvFilter` directive (e.g. `autotorrent_index=trace`);
/// `LOG_FILE_PATH` names the log file, which rolls daily next to itself.
/// Keep the returned guard alive until exit so buffered lines reach the file.
pub fn init_logger() -> WorkerGuard {
    let filter = EnvFilter::try_from_env("TRACING_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let log_file = env::var_os("LOG_FILE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    let (directory, file_name) = split_log_path(&log_file);

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(directory, file_name));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stdout),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_thread_ids(true)
                .with_writer(file_writer),
        )
        .init();

    tracing::debug!("Logging to stdout and {}", log_file.display());
    guard
}

/// Split a log file path into the appender's directory and file-name prefix.
fn split_log_path(path: &Path) -> (PathBuf, PathBuf) {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("autotorrent-index.log"));
    (directory, file_name)
}
