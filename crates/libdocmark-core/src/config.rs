use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::build_config::DEFAULT_BUILD_CONFIG_PATH;
use crate::error::DocmarkError;
use crate::snapshot::DEFAULT_SNAPSHOT_PATH;

/// Tool configuration stored in .docmark/config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocmarkConfig {
    /// Path of the build metadata file bumped by `docmark bump`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_config: Option<PathBuf>,
    /// Path of the comment snapshot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,
    /// Seconds to wait for the snapshot lock
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_timeout_secs: Option<u64>,
}

const DEFAULT_LOCK_TIMEOUT_SECS: u64 = 5;

impl DocmarkConfig {
    /// Build config path, resolved against `root` when relative
    pub fn build_config_path(&self, root: &Path) -> PathBuf {
        resolve(root, self.build_config.as_deref(), DEFAULT_BUILD_CONFIG_PATH)
    }

    /// Snapshot path, resolved against `root` when relative
    pub fn snapshot_path(&self, root: &Path) -> PathBuf {
        resolve(root, self.snapshot.as_deref(), DEFAULT_SNAPSHOT_PATH)
    }

    pub fn lock_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.lock_timeout_secs.unwrap_or(DEFAULT_LOCK_TIMEOUT_SECS))
    }
}

fn resolve(root: &Path, configured: Option<&Path>, default: &str) -> PathBuf {
    let path = configured.unwrap_or_else(|| Path::new(default));
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Default config file location under a project root
pub fn config_path(root: &Path) -> PathBuf {
    root.join(".docmark").join("config.toml")
}

/// Load config from `path`. A missing file yields `None`.
pub fn load_config(path: &Path) -> Result<Option<DocmarkConfig>, DocmarkError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    let config: DocmarkConfig = toml::from_str(&content)?;
    Ok(Some(config))
}

/// Save config to `path`, creating parent directories
pub fn save_config(path: &Path, config: &DocmarkConfig) -> Result<(), DocmarkError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
