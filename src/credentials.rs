use crate::config::schema::config_dir;
use crate::error::{Result, VsdkxError};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

const ENV_ENDPOINT: &str = "VSDKX_ENDPOINT";
const ENV_ACCESS_KEY: &str = "VSDKX_ACCESS_KEY";
const ENV_SECRET_KEY: &str = "VSDKX_SECRET_KEY";
const ENV_REGION: &str = "VSDKX_REGION";
const ENV_SECURE: &str = "VSDKX_SECURE";

const DEFAULT_REGION: &str = "us-east-1";

/// Object store credentials for one command invocation
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub secure: bool,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .field("region", &self.region)
            .field("secure", &self.secure)
            .finish()
    }
}

/// Source of object store credentials
pub trait CredentialProvider {
    fn read_secret(&self) -> Result<Credentials>;
}

/// Raw contents of `secret.toml`; every key is optional so env can fill gaps
#[derive(Deserialize, Debug, Default)]
struct SecretFile {
    endpoint: Option<String>,
    access_key: Option<String>,
    secret_key: Option<String>,
    region: Option<String>,
    secure: Option<bool>,
}

/// Credentials from `secret.toml`, overridden key by key by `VSDKX_*` env vars
#[derive(Debug, Clone)]
pub struct SecretStore {
    path: PathBuf,
}

impl SecretStore {
    /// Secret store at the default location
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: config_dir()?.join("secret.toml"),
        })
    }

    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load_file(&self) -> Result<SecretFile> {
        if !self.path.exists() {
            return Ok(SecretFile::default());
        }

        let content = fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            VsdkxError::Credentials(format!("Failed to parse {}: {e}", self.path.display()))
        })
    }
}

impl CredentialProvider for SecretStore {
    fn read_secret(&self) -> Result<Credentials> {
        let file = self.load_file()?;

        let endpoint = env_or(ENV_ENDPOINT, file.endpoint)
            .ok_or_else(|| missing("endpoint", ENV_ENDPOINT))?;
        let access_key = env_or(ENV_ACCESS_KEY, file.access_key)
            .ok_or_else(|| missing("access_key", ENV_ACCESS_KEY))?;
        let secret_key = env_or(ENV_SECRET_KEY, file.secret_key)
            .ok_or_else(|| missing("secret_key", ENV_SECRET_KEY))?;
        let region =
            env_or(ENV_REGION, file.region).unwrap_or_else(|| DEFAULT_REGION.to_string());

        let secure = match std::env::var(ENV_SECURE) {
            Ok(value) => parse_bool(&value).ok_or_else(|| {
                VsdkxError::Credentials(format!("{ENV_SECURE} must be true or false, got '{value}'"))
            })?,
            Err(_) => file.secure.unwrap_or(true),
        };

        tracing::debug!("Read object store credentials for {endpoint}");

        Ok(Credentials {
            endpoint,
            access_key,
            secret_key,
            region,
            secure,
        })
    }
}

fn env_or(var: &str, fallback: Option<String>) -> Option<String> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .or(fallback)
        .filter(|v| !v.is_empty())
}

fn missing(key: &str, var: &str) -> VsdkxError {
    VsdkxError::Credentials(format!("'{key}' is not set (secret file or {var})"))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
