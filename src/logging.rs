//! Log setup. The TUI owns the terminal, so interactive sessions log to a file.

use std::path::Path;
use tracing_subscriber::EnvFilter;

const FILE_LEVEL: &str = "info";
const STDERR_LEVEL: &str = "warn";

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Write logs to `<log_dir>/continuity.log`.
///
/// Returns false if a global subscriber was already installed; that one stays in effect.
pub fn init_file<P: AsRef<Path>>(log_dir: P) -> bool {
    let file_appender = tracing_appender::rolling::never(log_dir, "continuity.log");

    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter(FILE_LEVEL))
        .with_writer(file_appender)
        .with_ansi(false)
        .try_init();
    installed(result)
}

/// Write logs to stderr, warnings and above unless `RUST_LOG` says otherwise.
pub fn init_stderr() -> bool {
    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter(STDERR_LEVEL))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    installed(result)
}

fn installed<E: std::fmt::Display>(result: Result<(), E>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(%err, "log subscriber already installed, keeping it");
            false
        }
    }
}
