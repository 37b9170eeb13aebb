//! Application configuration.
//!
//! Loaded from YAML at `$CHORE_TRACKER_CONFIG`, or `config.yaml` in the default
//! data directory. A missing file is created with the defaults so there is
//! something to edit.
//!
//! ```yaml
//! data_directory: /home/me/Documents/Chore Tracker
//! server:
//!   host: 127.0.0.1
//!   port: 3000
//! children:
//!   - id: olive
//!     name: Oliver
//!     avatar: assets/olive.png
//!     allowance: 50.0
//! remote:
//!   url: https://example-default-rtdb.firebaseio.com
//!   document: kidsTasks
//!   poll_interval_secs: 5
//!   timeout_secs: 10
//! ```

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::models::ChildProfile;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "CHORE_TRACKER_CONFIG";
pub const CONFIG_FILE_NAME: &str = "config.yaml";
const DATA_DIRECTORY_NAME: &str = "Chore Tracker";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_directory: PathBuf,
    pub server: ServerConfig,
    pub children: Vec<ChildProfile>,
    pub remote: Option<RemoteConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            server: ServerConfig::default(),
            children: ChildProfile::default_roster(),
            remote: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub url: String,
    #[serde(default = "default_document")]
    pub document: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl RemoteConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

fn default_document() -> String {
    "kidsTasks".to_string()
}

fn default_poll_interval() -> u64 {
    5
}

fn default_timeout() -> u64 {
    10
}

/// `~/Documents/Chore Tracker`, falling back to the home directory and then
/// the working directory
pub fn default_data_directory() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIRECTORY_NAME)
}

/// Where the config file is read from
pub fn config_path() -> PathBuf {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) => PathBuf::from(path),
        None => default_data_directory().join(CONFIG_FILE_NAME),
    }
}

impl AppConfig {
    /// Load from the standard location
    pub fn load() -> Result<Self> {
        Self::load_or_create(&config_path())
    }

    /// Load `path`, writing the defaults there first if it does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let yaml = fs::read_to_string(path).with_context(|| format!("Failed to read config {:?}", path))?;
            let config: AppConfig =
                serde_yaml::from_str(&yaml).with_context(|| format!("Invalid config file {:?}", path))?;
            debug!("Loaded config from {:?}", path);
            config.validate()?;
            Ok(config)
        } else {
            let config = AppConfig::default();
            config.save(path)?;
            info!("Created default config at {:?}", path);
            Ok(config)
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
            }
        }
        let yaml = serde_yaml::to_string(self)?;
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, yaml)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.children.is_empty() {
            anyhow::bail!("Config must list at least one child");
        }
        let mut seen = std::collections::BTreeSet::new();
        for child in &self.children {
            if child.id.trim().is_empty() {
                anyhow::bail!("Child ids cannot be empty");
            }
            if !seen.insert(child.id.as_str()) {
                anyhow::bail!("Duplicate child id '{}' in config", child.id);
            }
            if child.allowance < 0.0 {
                anyhow::bail!("Allowance for '{}' cannot be negative", child.id);
            }
        }
        Ok(())
    }
}
