//! Configuration file handling

use crate::error::{DeltaError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "custdelta.json";

/// Source id whose customers are reported as online
pub const DEFAULT_ONLINE_SOURCE_ID: i64 = 2;

/// Default table for the optional master store
pub const DEFAULT_STORE_TABLE: &str = "customer_master";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeltaConfig {
    pub version: String,
    /// Root holding one `YYYYMMDD` directory per run
    pub data_directory: PathBuf,
    /// Dated log files go here; `null` logs to stderr
    pub log_directory: Option<PathBuf>,
    pub plot_directory: PathBuf,
    pub online_source_id: i64,
    pub store: Option<StoreConfig>,
}

/// Optional database that receives each run's master snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub database_path: PathBuf,
    #[serde(default = "default_store_table")]
    pub table: String,
}

fn default_store_table() -> String {
    DEFAULT_STORE_TABLE.to_string()
}

impl Default for DeltaConfig {
    fn default() -> Self {
        Self {
            version: crate::FORMAT_VERSION.to_string(),
            data_directory: PathBuf::from("data"),
            log_directory: Some(PathBuf::from("log")),
            plot_directory: PathBuf::from("plots"),
            online_source_id: DEFAULT_ONLINE_SOURCE_ID,
            store: None,
        }
    }
}

impl DeltaConfig {
    /// Defaults with every directory placed under `base`
    pub fn with_base_dir(base: &Path) -> Self {
        let defaults = Self::default();
        Self {
            data_directory: base.join(defaults.data_directory),
            log_directory: defaults.log_directory.map(|dir| base.join(dir)),
            plot_directory: base.join(defaults.plot_directory),
            ..defaults
        }
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DeltaError::config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            DeltaError::config(format!("Invalid config file {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config file, or the default one if present, or defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_directory.as_os_str().is_empty() {
            return Err(DeltaError::config("data_directory must not be empty"));
        }
        if let Some(store) = &self.store {
            crate::store::validate_table_name(&store.table)?;
        }
        Ok(())
    }

    /// Write the config as pretty JSON, keeping an existing file unless forced.
    ///
    /// Returns whether the file was written.
    pub fn save(&self, path: &Path, force: bool) -> Result<bool> {
        if path.exists() && !force {
            return Ok(false);
        }

        let mut value = serde_json::to_value(self)?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert("created".to_string(), serde_json::json!(chrono::Utc::now()));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(&value)?)?;
        Ok(true)
    }

    /// Create the data, plot and log directories
    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.data_directory)?;
        fs::create_dir_all(&self.plot_directory)?;
        if let Some(log_dir) = &self.log_directory {
            fs::create_dir_all(log_dir)?;
        }
        Ok(())
    }
}
