use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

pub const LOG_ENV: &str = "JSPLAY_LOG";
pub const LOG_FILE_NAME: &str = "jsplay.log";

/// Sends log records to `<data_dir>/jsplay.log`; the TUI owns the terminal.
///
/// `level` (from the command line) wins over `JSPLAY_LOG`, which wins over `info`.
pub fn init(data_dir: &Path, level: Option<&str>) -> Result<PathBuf> {
    std::fs::create_dir_all(data_dir).context("Failed to create data directory")?;
    let path = data_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let mut builder = Builder::from_env(Env::new().filter_or(LOG_ENV, "info"));
    if let Some(level) = level {
        builder.parse_filters(level);
    }

    builder
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .context("Logger already initialised")?;

    log::debug!("Logging to {}", path.display());
    Ok(path)
}
