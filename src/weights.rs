use crate::error::{Result, VsdkxError};
use crate::naming::ModelName;
use crate::project::ProjectLayout;
use crate::store::ObjectStore;
use std::fs;
use std::path::Path;

/// Downloads and removes a model's weight files
pub trait WeightHandler {
    /// Fetch the weight files named in `files`
    fn download(
        &self,
        store: &dyn ObjectStore,
        model: &ModelName,
        files: &[String],
    ) -> Result<()>;

    /// Remove all weight files of `model`
    fn remove(&self, model: &ModelName, files: &[String]) -> Result<()>;
}

/// Weights kept in the `{model}-weight` bucket and stored under `vsdkx/weights/<model>/`
#[derive(Debug, Clone)]
pub struct ObjectStoreWeights {
    layout: ProjectLayout,
}

impl ObjectStoreWeights {
    #[must_use]
    pub const fn new(layout: ProjectLayout) -> Self {
        Self { layout }
    }
}

impl WeightHandler for ObjectStoreWeights {
    fn download(
        &self,
        store: &dyn ObjectStore,
        model: &ModelName,
        files: &[String],
    ) -> Result<()> {
        if files.is_empty() {
            tracing::debug!("No weight files requested for {model}");
            return Ok(());
        }

        // Reject every name before fetching anything
        for file in files {
            validate_file_name(file)?;
        }

        let dir = self.layout.weights_dir(model);
        fs::create_dir_all(&dir)?;

        let bucket = model.weight_bucket();
        for file in files {
            tracing::info!("Downloading weight {file} from {bucket}");
            let bytes = store.get_object(&bucket, file)?;

            let path = dir.join(file);
            let tmp_path = dir.join(format!(".{file}.tmp"));
            fs::write(&tmp_path, &bytes)?;
            fs::rename(&tmp_path, &path)?;

            println!("✓ Downloaded weight {file} ({} bytes)", bytes.len());
        }

        Ok(())
    }

    fn remove(&self, model: &ModelName, _files: &[String]) -> Result<()> {
        let dir = self.layout.weights_dir(model);
        if !dir.exists() {
            return Ok(());
        }

        fs::remove_dir_all(&dir)?;
        tracing::info!("Removed weights in {}", dir.display());
        Ok(())
    }
}

fn validate_file_name(file: &str) -> Result<()> {
    let plain = Path::new(file)
        .file_name()
        .is_some_and(|name| name == file);
    if file.is_empty() || file == "." || file == ".." || file.contains(['/', '\\']) || !plain {
        return Err(VsdkxError::Validation(format!(
            "weight file '{file}' must be a plain file name"
        )));
    }
    Ok(())
}
