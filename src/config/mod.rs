//! Configuration
//!
//! Layered configuration for the store, the repository session, the ambient host
//! context and logging. See [`ConfigLoader`] for source precedence.

pub mod facade;
pub mod merge;
pub mod sources;
pub mod store_paths;
pub mod xdg;

pub use facade::ConfigLoader;
pub use store_paths::StoreConfig;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadtreeConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub host: HostConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// When artifacts already in the local store are fetched again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdatePolicy {
    /// Reuse stored artifacts.
    #[default]
    Never,
    /// Fetch on every resolution.
    Always,
}

/// Repository session policy defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub offline: bool,

    #[serde(default)]
    pub update_policy: UpdatePolicy,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    format!("loadtree/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            offline: false,
            update_policy: UpdatePolicy::default(),
            user_agent: default_user_agent(),
        }
    }
}

/// The embedding host's own loading context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    /// Directories and archives visible through the ambient host context.
    #[serde(default)]
    pub load_path: Vec<PathBuf>,
}
