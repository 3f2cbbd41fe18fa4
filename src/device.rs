//! Durable per-installation device identifier.
//!
//! Every record pushed to the remote store is tagged with the device it
//! originated from. The identifier is generated once, persisted to the
//! platform data directory, and reused for the lifetime of the
//! installation. No rotation and no uniqueness negotiation with the
//! remote store — collisions are assumed effectively impossible given
//! the identifier's entropy.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use uuid::Uuid;

pub struct DeviceIdentity {
    path: PathBuf,
    cached: OnceCell<String>,
}

impl DeviceIdentity {
    /// Device identity backed by a file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cached: OnceCell::new(),
        }
    }

    /// Device identity at the default platform location.
    pub fn from_default_path() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    /// Default file location under the platform data directory.
    pub fn default_path() -> Result<PathBuf> {
        dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
            .map(|dir| dir.join("ledgerist").join("device_id"))
    }

    /// The stable identifier for this installation.
    ///
    /// Generates and persists a new identifier on first call; later
    /// calls return the persisted value.
    pub fn get(&self) -> Result<String> {
        self.cached
            .get_or_try_init(|| self.load_or_create())
            .map(|id| id.clone())
    }

    fn load_or_create(&self) -> Result<String> {
        if self.path.exists() {
            let id = std::fs::read_to_string(&self.path)
                .with_context(|| format!("Failed to read device id file: {}", self.path.display()))?;
            let id = id.trim().to_string();
            if !id.is_empty() {
                return Ok(id);
            }
        }

        let id = Uuid::new_v4().to_string();
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }
        std::fs::write(&self.path, &id)
            .with_context(|| format!("Failed to write device id file: {}", self.path.display()))?;
        Ok(id)
    }
}
