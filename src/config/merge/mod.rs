//! Merge policy and service for config composition.

pub mod service;

use crate::store::DEFAULT_STORE_ROOT;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};

/// Builder seeded with built-in defaults (lowest precedence).
pub(crate) fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("store.root", DEFAULT_STORE_ROOT)?
        .set_default("session.offline", false)?
        .set_default("session.update_policy", "never")
}
