use std::path::PathBuf;
use std::time::Duration;

use libdocmark_core::config::{config_path, load_config};
use libdocmark_core::{DocmarkConfig, DocmarkError};
use tracing::debug;

use crate::cli::Cli;

/// Resolved paths and settings for a docmark command
pub struct DocmarkContext {
    pub root: PathBuf,
    pub config: DocmarkConfig,
}

impl DocmarkContext {
    /// Resolve the project root and load the tool config.
    ///
    /// An explicit `--config` must exist; the default location is optional.
    pub fn resolve(cli: &Cli) -> Result<Self, DocmarkError> {
        let root = match &cli.root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };

        let config = match &cli.config {
            Some(path) => load_config(path)?
                .ok_or_else(|| DocmarkError::missing_file("config file", path))?,
            None => load_config(&config_path(&root))?.unwrap_or_default(),
        };
        debug!(root = %root.display(), ?config, "resolved context");

        Ok(Self { root, config })
    }

    pub fn build_config_path(&self, override_path: Option<&PathBuf>) -> PathBuf {
        match override_path {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => self.root.join(p),
            None => self.config.build_config_path(&self.root),
        }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.config.snapshot_path(&self.root)
    }

    pub fn lock_timeout(&self) -> Duration {
        self.config.lock_timeout()
    }
}
