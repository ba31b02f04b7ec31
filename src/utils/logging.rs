//! Logging initialization for ScanBrief.
//!
//! Supports three formats:
//! - `pretty`: compact human-readable text
//! - `component`: same compact text; the default
//! - `json`: structured JSON lines for log aggregators (e.g. Loki, CloudWatch)

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};
use crate::error::Result;

/// Initialize the global tracing subscriber from config.
///
/// Call this once at startup before any tracing events are emitted.
/// `RUST_LOG` wins over `cfg.level` when set. Fails only when the configured
/// log file cannot be opened.
pub fn init_logging(cfg: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));

    match (cfg.format, &cfg.file) {
        (LogFormat::Json, Some(path)) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let _ = tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        (LogFormat::Json, None) => {
            let _ = tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .try_init();
        }
        (_, Some(path)) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .compact()
                .with_writer(Mutex::new(file))
                .try_init();
        }
        (_, None) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .compact()
                .with_writer(std::io::stderr)
                .try_init();
        }
    }

    Ok(())
}
