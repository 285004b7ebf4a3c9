//! Configuration loading for BlobSync
//!
//! Loads the YAML configuration file once at startup. Components never read
//! configuration from ambient global state; the composition root resolves a
//! [`Config`] and passes the relevant sections into each component.

pub mod error;
pub mod model;

pub use error::*;
pub use model::*;

use std::path::Path;

/// Load configuration from a YAML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let raw = std::fs::read_to_string(path.as_ref())
        .map_err(|e| ConfigError::SourceNotFound(format!("{}: {}", path.as_ref().display(), e)))?;
    let cfg: Config = serde_yaml::from_str(&raw)?;
    Ok(cfg)
}
