use crate::error::Result;
use crate::profile::document::{load_document, save_document};
use serde_yaml::Value;
use std::path::Path;

const MODEL_SECTION: &str = "model";
const PROFILE_KEY: &str = "profile";

/// Drop the `model` section from the settings file when its `profile` is `model`.
///
/// Returns whether the file was rewritten. A missing file, an empty document
/// or a section naming another model leaves everything untouched.
pub fn clean_settings(path: &Path, model: &str) -> Result<bool> {
    let Some(mut settings) = load_document(path)? else {
        return Ok(false);
    };

    let active = settings
        .get(MODEL_SECTION)
        .and_then(Value::as_mapping)
        .and_then(|section| section.get(PROFILE_KEY))
        .and_then(Value::as_str);

    if active != Some(model) {
        return Ok(false);
    }

    settings.remove(MODEL_SECTION);
    save_document(path, &settings)?;

    tracing::info!("Removed active model '{model}' from {}", path.display());
    Ok(true)
}
