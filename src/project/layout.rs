use crate::naming::ModelName;
use std::path::PathBuf;

/// Project-relative locations of every file this tool touches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `vsdkx/`
    #[must_use]
    pub fn vsdkx_dir(&self) -> PathBuf {
        self.root.join("vsdkx")
    }

    /// `vsdkx/model/`
    #[must_use]
    pub fn model_dir(&self) -> PathBuf {
        self.vsdkx_dir().join("model")
    }

    /// `vsdkx/model/profile.yaml`
    #[must_use]
    pub fn profile_path(&self) -> PathBuf {
        self.model_dir().join("profile.yaml")
    }

    /// `vsdkx/settings.yaml`
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.vsdkx_dir().join("settings.yaml")
    }

    /// `vsdkx/app.yaml`
    #[must_use]
    pub fn app_manifest_path(&self) -> PathBuf {
        self.vsdkx_dir().join("app.yaml")
    }

    /// `vsdkx/weights/<model>/`
    #[must_use]
    pub fn weights_dir(&self, model: &ModelName) -> PathBuf {
        self.vsdkx_dir().join("weights").join(model.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let layout = ProjectLayout::new("/work/app");
        assert_eq!(
            layout.profile_path(),
            PathBuf::from("/work/app/vsdkx/model/profile.yaml")
        );
        assert_eq!(
            layout.settings_path(),
            PathBuf::from("/work/app/vsdkx/settings.yaml")
        );
        assert_eq!(
            layout.app_manifest_path(),
            PathBuf::from("/work/app/vsdkx/app.yaml")
        );

        let model = ModelName::parse("yolo").unwrap();
        assert_eq!(
            layout.weights_dir(&model),
            PathBuf::from("/work/app/vsdkx/weights/yolo")
        );
    }
}
