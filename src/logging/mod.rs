// src/logging/mod.rs
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::core::config::Config;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Logger already initialized")]
    AlreadyInitialized,
}

pub type Result<T> = std::result::Result<T, LoggingError>;

/// Open `path` for appending, creating it and its parent directory if needed.
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    Ok(file)
}

/// Install the global logger and report any configuration warnings. Output
/// goes to the configured log file, or to stderr when that file cannot be
/// opened.
pub fn init(config: &Config) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(config.log_level)
        .format_timestamp_secs()
        .format_module_path(true);

    let fallback = match open_log_file(&config.log_file) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            None
        }
        Err(e) => {
            builder.target(env_logger::Target::Stderr);
            Some(e)
        }
    };

    builder.try_init().map_err(|_| LoggingError::AlreadyInitialized)?;

    if let Some(e) = fallback {
        log::warn!("Could not open log file {}: {}; logging to stderr", config.log_file.display(), e);
    }

    for warning in &config.warnings {
        log::warn!("{}", warning);
    }

    Ok(())
}
