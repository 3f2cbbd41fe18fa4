//! Configuration management for ledgerist
//!
//! This module handles loading, parsing, and validation of configuration files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_GENERATED, MIN_SYNC_INTERVAL_HOURS, TOMBSTONE_RETENTION_DAYS};
use crate::scheduler::SyncOptions;
use crate::utils::datetime;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub sync: SyncConfig,
    pub cleanup: CleanupConfig,
    pub logging: LoggingConfig,
}

/// Sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Periodic full-sync interval in hours
    pub auto_sync_interval_hours: u64,
    /// Only sync on unmetered (wifi) networks
    pub require_unmetered: bool,
    /// Only sync while the device is charging
    pub require_charging: bool,
}

/// Tombstone cleanup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Days a soft-deleted row is retained before permanent erasure
    pub retention_days: i64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable file logging
    pub enabled: bool,
    /// Log level filter: "off", "error", "warn", "info", "debug" or "trace"
    pub level: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            auto_sync_interval_hours: 6,
            require_unmetered: true,
            require_charging: false,
        }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            retention_days: TOMBSTONE_RETENTION_DAYS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
        }
    }
}

impl SyncConfig {
    /// Scheduler options carrying these settings.
    pub fn options(&self) -> SyncOptions {
        SyncOptions {
            interval_hours: self.auto_sync_interval_hours,
            require_unmetered: self.require_unmetered,
            require_charging: self.require_charging,
        }
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from("ledgerist.toml");
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("ledgerist").join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.sync.auto_sync_interval_hours < MIN_SYNC_INTERVAL_HOURS {
            anyhow::bail!(
                "auto_sync_interval_hours must be at least {}, got {}",
                MIN_SYNC_INTERVAL_HOURS,
                self.sync.auto_sync_interval_hours
            );
        }
        if self.sync.auto_sync_interval_hours > 168 {
            anyhow::bail!("auto_sync_interval_hours cannot exceed 168 (one week)");
        }

        if self.cleanup.retention_days < 1 {
            anyhow::bail!(
                "retention_days must be at least 1, got {}",
                self.cleanup.retention_days
            );
        }

        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            anyhow::bail!("Invalid log level '{}'", self.logging.level);
        }

        Ok(())
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        // Add header comment
        let header = format!(
            "# Ledgerist Configuration File\n# Generated on {}\n\n",
            chrono::Local::now().format(datetime::DATE_FORMAT)
        );

        let full_content = header + &toml_content;

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        log::info!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join("ledgerist"))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
