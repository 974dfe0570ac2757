//! Configuration
//!
//! Layered configuration loaded with the `config` crate: built-in defaults,
//! then the optional global file `$XDG_CONFIG_HOME/catalog-admin/config.toml`,
//! then `CATALOG__*` environment variables (`__` separates nested keys, e.g.
//! `CATALOG__STORAGE__DATA_DIR`).

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod storage_paths;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use storage_paths::StorageConfig;

use crate::logging::LoggingConfig;
use crate::types::Language;
use serde::{Deserialize, Serialize};

/// Application name used for config, data and state directories.
pub const APP_NAME: &str = "catalog-admin";

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Content language used when `--lang` is not given
    #[serde(default)]
    pub default_language: Language,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}
