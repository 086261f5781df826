use crate::error::{Result, VsdkxError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub package_manager: PackageManagerConfig,
    #[serde(default)]
    pub object_store: ObjectStoreConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct PackageManagerConfig {
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default = "default_program_args")]
    pub args: Vec<String>,
    pub index_url: Option<String>,
    pub extra_index_url: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ObjectStoreConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    #[serde(default)]
    pub missing_key: MissingKeyPolicy,
}

/// What `remove-model` does when the profile has no section for the model
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MissingKeyPolicy {
    /// Abort the removal with a `MissingKey` error
    #[default]
    Error,
    /// Log a warning and continue with the remaining steps
    Ignore,
}

// Default value functions
fn default_program() -> String {
    "python3".to_string()
}
fn default_program_args() -> Vec<String> {
    vec!["-m".to_string(), "pip".to_string()]
}
const fn default_timeout_secs() -> u64 {
    30
}

impl Default for PackageManagerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_program_args(),
            index_url: None,
            extra_index_url: None,
        }
    }
}

impl Default for ObjectStoreConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load config from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };

        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| {
            VsdkxError::Config(format!("Failed to parse {}: {e}", path.display()))
        })
    }
}

/// Directory holding `config.toml` and `secret.toml`
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("vsdkx"))
        .ok_or_else(|| VsdkxError::Config("Cannot determine config directory".to_string()))
}

/// Get default config path
pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
