//! StorageConfig and data directory resolution.

use crate::config::xdg;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the persisted JSON blobs; None means the XDG default
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the data directory with precedence: CLI override, config, XDG default.
    pub fn resolve_data_dir(&self, cli_override: Option<PathBuf>) -> Result<PathBuf, ApiError> {
        if let Some(dir) = cli_override.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(dir);
        }
        if let Some(dir) = self.data_dir.clone().filter(|p| !p.as_os_str().is_empty()) {
            return Ok(dir);
        }
        xdg::default_data_dir()
    }
}
