use crate::error::{Result, VsdkxError};
use crate::profile::document::{load_document, save_document};
use serde_yaml::{Mapping, Value};
use std::path::Path;

const INSTALLED_APPS: &str = "installed_apps";

/// Register (`remove == false`) or deregister `entry` in the app manifest.
///
/// Adding is idempotent. Removing an entry that is not registered, or from a
/// manifest that does not exist, is a no-op. Other keys are preserved.
pub fn modify_app(path: &Path, entry: &str, remove: bool) -> Result<()> {
    let existing = load_document(path)?;
    if remove && existing.is_none() {
        return Ok(());
    }

    let mut manifest = existing.unwrap_or_default();
    let mut apps = installed_apps(&manifest, path)?;
    let registered = apps.iter().any(|app| app == entry);

    match (remove, registered) {
        (false, false) => {
            apps.push(entry.to_string());
            tracing::info!("Registered {entry} in {}", path.display());
        }
        (true, true) => {
            apps.retain(|app| app != entry);
            tracing::info!("Deregistered {entry} from {}", path.display());
        }
        (false, true) | (true, false) => {
            tracing::debug!("{entry} already in the requested state");
            return Ok(());
        }
    }

    let apps = apps.into_iter().map(Value::String).collect();
    manifest.insert(Value::from(INSTALLED_APPS), Value::Sequence(apps));
    save_document(path, &manifest)
}

/// Entries currently registered in the manifest at `path`
pub fn registered_apps(path: &Path) -> Result<Vec<String>> {
    match load_document(path)? {
        Some(manifest) => installed_apps(&manifest, path),
        None => Ok(Vec::new()),
    }
}

fn installed_apps(manifest: &Mapping, path: &Path) -> Result<Vec<String>> {
    match manifest.get(INSTALLED_APPS) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    VsdkxError::Document(format!(
                        "{}: {INSTALLED_APPS} entries must be strings",
                        path.display()
                    ))
                })
            })
            .collect(),
        Some(_) => Err(VsdkxError::Document(format!(
            "{}: {INSTALLED_APPS} must be a list",
            path.display()
        ))),
    }
}
