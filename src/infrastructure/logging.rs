//! Diagnostics go to a file; the terminal belongs to the dashboard.

use crate::infrastructure::AppConfig;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Cannot open log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot install log subscriber: {0}")]
    Init(String),
}

/// `RUST_LOG` wins over the configured filter.
pub fn env_filter(config: &AppConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
}

pub fn init(config: &AppConfig) -> Result<(), LoggingError> {
    if let Some(parent) = config.log_file.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}
