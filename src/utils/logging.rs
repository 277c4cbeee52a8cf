//! Logger bootstrap shared by the CLI and the tray app

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::constants::{APP_DIR_NAME, LOG_FILE_NAME};

/// Where log records end up
pub enum LogTarget<'a> {
    Stderr,
    /// Append to the given file, creating it (and its directory) if needed
    File(&'a Path),
}

/// Default log file location
///
/// - macOS: `~/Library/Application Support/caffeine/caffeine.log`
/// - Linux: `~/.config/caffeine/caffeine.log`
/// - Windows: `%APPDATA%\caffeine\caffeine.log`
pub fn default_log_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Failed to determine config directory")?;
    Ok(dir.join(APP_DIR_NAME).join(LOG_FILE_NAME))
}

/// Initialize env_logger at info level (RUST_LOG still wins)
pub fn init(target: LogTarget<'_>) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Info)
        .parse_default_env();

    if let LogTarget::File(path) = target {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create log directory")?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("Logger already initialized")?;
    Ok(())
}
