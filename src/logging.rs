//! File-backed tracing setup
//!
//! The terminal is owned by the TUI, so log lines only go to a file.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Install a global subscriber appending to `path`.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`.
pub fn init_file_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| io::Error::other(format!("logging already initialized: {err}")))
}
