use crate::commands::{AddOutcome, ModelCommands};
use crate::error::{Result, VsdkxError};
use crate::naming::{ModelName, PROFILE_OBJECT};
use crate::profile::{load_document, merge_into, parse_bytes, save_document};
use crate::project::{create_folder, modify_app};
use crate::store::ObjectStore;

impl ModelCommands {
    /// Add a model driver to the project.
    ///
    /// Steps: validate name, install package, create project folders, fetch
    /// the default profile, merge it under the local profile, register the
    /// app entry, download weights.
    ///
    /// # Errors
    /// - `Validation` if `name` is not a valid model name (nothing else runs)
    /// - `PackageManager` if the install fails (nothing else runs)
    /// - `Document` if the fetched profile is empty or not a mapping (the
    ///   package stays installed, no project file is written)
    /// - `Document`/`Io` if the local profile or manifest cannot be read or written
    ///
    /// Object store failures are not errors: they end the command early and
    /// are reported through [`AddOutcome`].
    pub fn add_model(
        &self,
        name: &str,
        weight_files: &[String],
        store: &dyn ObjectStore,
    ) -> Result<AddOutcome> {
        let model = ModelName::parse(name)?;
        println!("Adding model {model} ...");

        self.packages.install(&model.package())?;

        create_folder(&self.layout.vsdkx_dir())?;
        create_folder(&self.layout.model_dir())?;

        let bucket = model.profile_bucket();
        tracing::info!("Fetching {PROFILE_OBJECT} from {bucket}");
        let remote = match store.get_object(&bucket, PROFILE_OBJECT) {
            Ok(bytes) => parse_bytes(&bytes)?.ok_or_else(|| {
                VsdkxError::Document(format!("{PROFILE_OBJECT} in bucket {bucket} is empty"))
            })?,
            Err(e) => {
                tracing::error!("Failed to fetch profile for {model}: {e}");
                return Ok(AddOutcome::ProfileUnavailable(e));
            }
        };

        let profile_path = self.layout.profile_path();
        let local = load_document(&profile_path)?;
        let merged = merge_into(remote, local);
        save_document(&profile_path, &merged)?;

        modify_app(&self.layout.app_manifest_path(), &model.app_entry(), false)?;
        println!("✓ {model} added");

        match self.weights.download(store, &model, weight_files) {
            Ok(()) => Ok(AddOutcome::Added),
            Err(VsdkxError::ObjectStore(e)) => {
                tracing::error!("Failed to download weights for {model}: {e}");
                Ok(AddOutcome::WeightsUnavailable(e))
            }
            Err(e) => Err(e),
        }
    }
}
