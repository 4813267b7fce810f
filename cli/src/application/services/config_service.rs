//! Application service: configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{HostprepConfig, apply_config_value};

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed.
pub fn load_config(store: &impl ConfigStore) -> Result<HostprepConfig> {
    store.load()
}

/// Validate and persist a single `key = value` setting.
///
/// Nothing is written when validation fails.
///
/// # Errors
///
/// Returns an error on an unknown key, an invalid value, or a failed save.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<HostprepConfig> {
    let mut config = store.load()?;
    apply_config_value(&mut config, key, value)?;
    store.save(&config)?;
    tracing::info!(key, value, "config updated");
    Ok(config)
}
