//! Logging initialization.
//!
//! File-backed logging via fern, gated by configuration. The engine
//! itself only uses the `log` facade macros; hosts that want their own
//! logger can skip this and install one themselves.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::LoggingConfig;

/// Initialize the global logger. No-op when logging is disabled.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if !config.enabled {
        return Ok(());
    }

    let level = config
        .level
        .parse::<log::LevelFilter>()
        .map_err(|_| anyhow::anyhow!("Invalid log level '{}'", config.level))?;

    let path = log_file_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(fern::log_file(&path).with_context(|| format!("Failed to open log file: {}", path.display()))?)
        .apply()
        .context("Logger already initialized")?;

    Ok(())
}

/// Log file location under the platform data directory.
pub fn log_file_path() -> Result<PathBuf> {
    dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
        .map(|dir| dir.join("ledgerist").join("ledgerist.log"))
}
