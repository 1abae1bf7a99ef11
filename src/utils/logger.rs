// Tracing subscriber setup
//
// The server logs to stdout. The TUI owns the terminal, so it logs to a
// daily-rolling file instead.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "oxidation_search=debug,tower_http=debug,axum=debug";
const LOG_FILE_PREFIX: &str = "oxidation-search.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Log to stdout
pub fn init_stdout() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Log to `<dir>/oxidation-search.log.<date>`. Keep the guard alive until exit.
pub fn init_file(dir: &Path) -> anyhow::Result<WorkerGuard> {
    let (writer, guard) = file_writer(dir)?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    Ok(guard)
}

fn file_writer(
    dir: &Path,
) -> anyhow::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}

/// Default directory for TUI logs
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("oxidation-search")
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_writer_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join("logs");

        let (_writer, _guard) = file_writer(&dir).unwrap();

        assert!(dir.is_dir());
    }

    #[test]
    fn test_log_dir_is_namespaced() {
        assert!(log_dir().ends_with("oxidation-search/logs"));
    }
}
