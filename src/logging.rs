//! Log setup. The terminal belongs to the editor, so events go to a file.

use std::path::{Path, PathBuf};

use etcetera::base_strategy::{choose_base_strategy, BaseStrategy};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the filter directives, e.g. `veditor=debug`.
pub const LOG_ENV: &str = "VEDITOR_LOG";
pub const LOG_FILE: &str = "veditor.log";

/// `<platform cache dir>/veditor`, or the temp dir when there is none.
pub fn default_log_dir() -> PathBuf {
    choose_base_strategy()
        .map(|s| s.cache_dir().join("veditor"))
        .unwrap_or_else(|_| std::env::temp_dir().join("veditor"))
}

/// Installs the global subscriber writing to `dir/veditor.log`.
///
/// Keep the guard alive for the life of the program; dropping it flushes
/// and stops the writer thread.
pub fn init(dir: &Path) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;
    let (writer, guard) = non_blocking(rolling::never(dir, LOG_FILE));
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init();
    if let Err(err) = result {
        // a subscriber is already installed (tests, embedding apps)
        eprintln!("veditor: logging not initialised: {err}");
    }
    Ok(guard)
}
