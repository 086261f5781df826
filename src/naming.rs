use crate::error::{Result, VsdkxError};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Model names: lowercase letters and digits, separated by single hyphens
pub const NAME_PATTERN: &str = r"^[a-z0-9]+(-[a-z0-9]+)*$";

pub const PACKAGE_PREFIX: &str = "vsdkx-model-";
pub const APP_ENTRY_PREFIX: &str = "model-";
pub const PROFILE_BUCKET_SUFFIX: &str = "-profile";
pub const PROFILE_OBJECT: &str = "profile.yaml";
pub const WEIGHT_BUCKET_SUFFIX: &str = "-weight";

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_regex() -> Result<&'static Regex> {
    if let Some(re) = NAME_RE.get() {
        return Ok(re);
    }

    let re = Regex::new(NAME_PATTERN)
        .map_err(|e| VsdkxError::Config(format!("Invalid model name pattern: {e}")))?;
    Ok(NAME_RE.get_or_init(|| re))
}

/// A validated model driver name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelName(String);

impl ModelName {
    /// Validate `name` against [`NAME_PATTERN`]
    pub fn parse(name: &str) -> Result<Self> {
        if !name_regex()?.is_match(name) {
            return Err(VsdkxError::Validation(format!(
                "'{name}' does not match {NAME_PATTERN}"
            )));
        }

        Ok(Self(name.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Installable package, e.g. `vsdkx-model-yolo`
    #[must_use]
    pub fn package(&self) -> String {
        format!("{PACKAGE_PREFIX}{}", self.0)
    }

    /// App manifest entry, e.g. `model-yolo`
    #[must_use]
    pub fn app_entry(&self) -> String {
        format!("{APP_ENTRY_PREFIX}{}", self.0)
    }

    #[must_use]
    pub fn profile_bucket(&self) -> String {
        format!("{}{PROFILE_BUCKET_SUFFIX}", self.0)
    }

    #[must_use]
    pub fn weight_bucket(&self) -> String {
        format!("{}{WEIGHT_BUCKET_SUFFIX}", self.0)
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
