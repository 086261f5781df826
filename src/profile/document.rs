use crate::config::MissingKeyPolicy;
use crate::error::{Result, VsdkxError};
use crate::profile::emit::to_yaml_string;
use serde_yaml::{Mapping, Value};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;

/// Load a YAML mapping from `path`.
///
/// Returns `None` when the file is absent or holds an empty document.
///
/// # Errors
/// - Returns error if the file is not valid YAML
/// - Returns error if the top-level value is not a mapping
pub fn load_document(path: &Path) -> Result<Option<Mapping>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    parse_document(&content)
        .map_err(|e| VsdkxError::Document(format!("{}: {e}", path.display())))
}

/// Parse a YAML mapping from raw bytes (e.g. an object store response)
pub fn parse_bytes(bytes: &[u8]) -> Result<Option<Mapping>> {
    let content = std::str::from_utf8(bytes)
        .map_err(|e| VsdkxError::Document(format!("Document is not UTF-8: {e}")))?;
    parse_document(content).map_err(VsdkxError::Document)
}

fn parse_document(content: &str) -> std::result::Result<Option<Mapping>, String> {
    if content.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
    match value {
        Value::Null => Ok(None),
        Value::Mapping(mapping) => Ok(Some(mapping)),
        other => Err(format!(
            "expected a mapping at the top level, found {}",
            kind(&other)
        )),
    }
}

/// Write `document` to `path` atomically (tmp + rename).
///
/// Keys are written in sorted order and strings a YAML 1.1 reader would
/// take for another type are quoted.
pub fn save_document(path: &Path, document: &Mapping) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let sorted = sort_mapping(document.clone());
    let content = to_yaml_string(&sorted).map_err(|e| match e {
        VsdkxError::Document(msg) => {
            VsdkxError::Document(format!("Failed to serialize {}: {msg}", path.display()))
        }
        other => other,
    })?;

    let tmp_path = path.with_extension("yaml.tmp");
    fs::write(&tmp_path, content)?;
    fs::rename(&tmp_path, path)?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

/// Shallow merge: start from `remote`, then let every `local` key win
#[must_use]
pub fn merge_into(remote: Mapping, local: Option<Mapping>) -> Mapping {
    let mut merged = remote;
    for (key, value) in local.into_iter().flatten() {
        merged.insert(key, value);
    }
    merged
}

/// Drop the top-level `model` key from `document`.
///
/// Returns whether the key was present. Under [`MissingKeyPolicy::Error`] an
/// absent key is a `MissingKey` error and the document is left untouched.
pub fn remove_model_key(
    document: &mut Mapping,
    model: &str,
    policy: MissingKeyPolicy,
) -> Result<bool> {
    if document.remove(model).is_some() {
        return Ok(true);
    }

    match policy {
        MissingKeyPolicy::Error => Err(VsdkxError::MissingKey(model.to_string())),
        MissingKeyPolicy::Ignore => {
            tracing::warn!("Profile has no section for '{model}', nothing to remove");
            Ok(false)
        }
    }
}

fn sort_mapping(mapping: Mapping) -> Mapping {
    let mut entries: Vec<(Value, Value)> = mapping
        .into_iter()
        .map(|(k, v)| (k, sort_keys(v)))
        .collect();
    entries.sort_by(|(a, _), (b, _)| compare_keys(a, b));
    entries.into_iter().collect()
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Mapping(mapping) => Value::Mapping(sort_mapping(mapping)),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Keys of one kind compare by value; mixed kinds group by kind, stable within
fn compare_keys(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => a
                .as_f64()
                .unwrap_or(f64::NAN)
                .total_cmp(&b.as_f64().unwrap_or(f64::NAN)),
        },
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

const fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Sequence(_) => 4,
        Value::Mapping(_) => 5,
        Value::Tagged(_) => 6,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_load_absent_file() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = load_document(&temp_dir.path().join("profile.yaml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profile.yaml");
        fs::write(&path, "\n").unwrap();
        assert!(load_document(&path).unwrap().is_none());

        fs::write(&path, "~\n").unwrap();
        assert!(load_document(&path).unwrap().is_none());
    }

    #[test]
    fn test_load_non_mapping_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profile.yaml");
        fs::write(&path, "- a\n- b\n").unwrap();

        match load_document(&path) {
            Err(VsdkxError::Document(msg)) => assert!(msg.contains("a sequence")),
            other => panic!("Expected document error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profile.yaml");
        fs::write(&path, "a: [1, 2\n").unwrap();
        assert!(matches!(load_document(&path), Err(VsdkxError::Document(_))));
    }

    #[test]
    fn test_parse_bytes() {
        let parsed = parse_bytes(b"yolo:\n  conf: 0.5\n").unwrap().unwrap();
        assert_eq!(parsed, mapping("yolo: {conf: 0.5}"));
        assert!(parse_bytes(b"").unwrap().is_none());
        assert!(parse_bytes(&[0xff, 0xfe]).is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vsdkx").join("model").join("profile.yaml");

        let document = mapping(
            "yolo:\n  input_shape: [640, 640]\n  classes:\n    - person\n    - car\n  conf_thresh: 0.25\n  name: detector\nresnet:\n  depth: 50\n",
        );

        save_document(&path, &document).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("yaml.tmp").exists());

        let loaded = load_document(&path).unwrap().unwrap();
        assert_eq!(loaded, document);
    }

    #[test]
    fn test_save_sorts_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profile.yaml");

        save_document(&path, &mapping("zeta: 1\nalpha: {b: 2, a: 1}\n")).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "alpha:\n  a: 1\n  b: 2\nzeta: 1\n");
    }

    #[test]
    fn test_save_sorts_non_string_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profile.yaml");

        save_document(&path, &mapping("classes: {10: truck, 1: b, 0: a}
")).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "classes:\n  0: a\n  1: b\n  10: truck\n");
    }

    #[test]
    fn test_save_quotes_yaml11_ambiguous_strings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profile.yaml");

        let document = mapping(
            "'yes': 'yes'\n'no': 'no'\n'on': 'on'\n'off': 'off'\n'y': 'y'\n'1_000': '1_000'\n'2024-01-01': '2024-01-01'\nlabel: person\n",
        );
        save_document(&path, &document).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        for s in ["yes", "no", "on", "off", "y", "1_000", "2024-01-01"] {
            assert!(
                content.contains(&format!("'{s}': '{s}'\n")),
                "{s:?} unquoted in:\n{content}"
            );
        }
        assert!(content.contains("label: person\n"));
        assert_eq!(load_document(&path).unwrap(), Some(document));
    }

    #[test]
    fn test_save_empty_mapping() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profile.yaml");

        save_document(&path, &Mapping::new()).unwrap();
        assert!(path.exists());
        assert_eq!(load_document(&path).unwrap(), Some(Mapping::new()));
    }

    #[test]
    fn test_merge_local_wins() {
        let remote = mapping("a: 1\nb: {x: 1}\nc: remote\n");
        let local = mapping("b: {y: 2}\nd: 4\n");

        let merged = merge_into(remote, Some(local));
        assert_eq!(merged, mapping("a: 1\nb: {y: 2}\nc: remote\nd: 4\n"));
    }

    #[test]
    fn test_merge_absent_local() {
        let remote = mapping("a: 1\nb: 2\n");
        assert_eq!(merge_into(remote.clone(), None), remote);
        assert_eq!(merge_into(remote.clone(), Some(Mapping::new())), remote);
    }

    #[test]
    fn test_remove_present_key() {
        let mut document = mapping("a: 1\nb: 2\n");
        let removed = remove_model_key(&mut document, "a", MissingKeyPolicy::Error).unwrap();
        assert!(removed);
        assert_eq!(document, mapping("b: 2\n"));
    }

    #[test]
    fn test_remove_missing_key_strict() {
        let mut document = mapping("a: 1\nb: 2\n");
        let result = remove_model_key(&mut document, "c", MissingKeyPolicy::Error);
        assert!(matches!(result, Err(VsdkxError::MissingKey(ref name)) if name == "c"));
        assert_eq!(document, mapping("a: 1\nb: 2\n"));
    }

    #[test]
    fn test_remove_missing_key_ignored() {
        let mut document = mapping("a: 1\n");
        let removed = remove_model_key(&mut document, "c", MissingKeyPolicy::Ignore).unwrap();
        assert!(!removed);
        assert_eq!(document, mapping("a: 1\n"));
    }
}
