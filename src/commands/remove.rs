use crate::commands::ModelCommands;
use crate::error::Result;
use crate::naming::ModelName;
use crate::profile::{clean_settings, load_document, remove_model_key, save_document};
use crate::project::modify_app;

impl ModelCommands {
    /// Remove a model driver from the project.
    ///
    /// Steps: uninstall package, drop the model's profile section, deregister
    /// the app entry, clear it from settings if active, remove weights.
    ///
    /// # Errors
    /// - `Validation` if `name` is not a valid model name (nothing else runs)
    /// - `PackageManager` if the uninstall fails
    /// - `MissingKey` if the profile exists without a section for the model
    ///   and the policy is strict; later steps do not run
    pub fn remove_model(&self, name: &str, weight_files: &[String]) -> Result<()> {
        let model = ModelName::parse(name)?;
        println!("Removing model {model} ...");

        self.packages.uninstall(&model.package())?;

        let profile_path = self.layout.profile_path();
        if profile_path.exists() {
            let mut profile = load_document(&profile_path)?.unwrap_or_default();
            if remove_model_key(&mut profile, model.as_str(), self.missing_key)? {
                save_document(&profile_path, &profile)?;
            }
        }

        modify_app(&self.layout.app_manifest_path(), &model.app_entry(), true)?;
        clean_settings(&self.layout.settings_path(), model.as_str())?;
        self.weights.remove(&model, weight_files)?;

        println!("✓ {model} removed");
        Ok(())
    }
}
