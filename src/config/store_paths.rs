//! StoreConfig and root resolution for the local artifact store.

use crate::config::xdg;
use crate::error::ApiError;
use crate::store::DEFAULT_STORE_ROOT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_store_root() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_ROOT)
}

/// Local store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store root; relative paths live under `$XDG_DATA_HOME/loadtree`
    #[serde(default = "default_store_root")]
    pub root: PathBuf,
}

impl StoreConfig {
    /// Resolve the store root to an actual filesystem location.
    pub fn resolve_root(&self) -> Result<PathBuf, ApiError> {
        if self.root.is_absolute() {
            return Ok(self.root.clone());
        }
        let data_home = xdg::data_home().ok_or_else(|| {
            ApiError::ConfigError(
                "Could not determine XDG data home directory (HOME not set)".to_string(),
            )
        })?;
        Ok(data_home.join("loadtree").join(&self.root))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_store_root(),
        }
    }
}
