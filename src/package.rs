use crate::config::schema::PackageManagerConfig;
use crate::error::{Result, VsdkxError};
use std::path::PathBuf;
use subprocess::Exec;

/// Host package manager operations
pub trait PackageManager {
    fn install(&self, package: &str) -> Result<()>;
    fn uninstall(&self, package: &str) -> Result<()>;
}

/// pip, invoked as `<program> <args> install|uninstall ...`
///
/// The child inherits stdout/stderr so the user sees pip's own progress.
#[derive(Debug, Clone)]
pub struct Pip {
    program: PathBuf,
    base_args: Vec<String>,
    index_url: Option<String>,
    extra_index_url: Option<String>,
}

impl Pip {
    /// Resolve the configured program in PATH
    ///
    /// # Errors
    /// - Returns error if the program cannot be found
    pub fn from_config(config: &PackageManagerConfig) -> Result<Self> {
        let program = which::which(&config.program).map_err(|e| {
            VsdkxError::PackageManager(format!("'{}' not found in PATH: {e}", config.program))
        })?;

        Ok(Self {
            program,
            base_args: config.args.clone(),
            index_url: config.index_url.clone(),
            extra_index_url: config.extra_index_url.clone(),
        })
    }

    fn install_args(&self, package: &str) -> Vec<String> {
        let mut args = self.base_args.clone();
        args.push("install".to_string());
        args.push(package.to_string());
        if let Some(url) = &self.index_url {
            args.push("--index-url".to_string());
            args.push(url.clone());
        }
        if let Some(url) = &self.extra_index_url {
            args.push("--extra-index-url".to_string());
            args.push(url.clone());
        }
        args
    }

    fn uninstall_args(&self, package: &str) -> Vec<String> {
        let mut args = self.base_args.clone();
        args.extend(["uninstall".to_string(), "-y".to_string(), package.to_string()]);
        args
    }

    fn run(&self, args: &[String]) -> Result<()> {
        let command_line = format!("{} {}", self.program.display(), args.join(" "));
        tracing::debug!("Running {command_line}");

        let status = Exec::cmd(&self.program)
            .args(args)
            .join()
            .map_err(|e| VsdkxError::PackageManager(format!("Failed to run {command_line}: {e}")))?;

        if !status.success() {
            return Err(VsdkxError::PackageManager(format!(
                "{command_line} exited with {status:?}"
            )));
        }

        Ok(())
    }
}

impl PackageManager for Pip {
    fn install(&self, package: &str) -> Result<()> {
        tracing::info!("Installing {package}");
        self.run(&self.install_args(package))
    }

    fn uninstall(&self, package: &str) -> Result<()> {
        tracing::info!("Uninstalling {package}");
        self.run(&self.uninstall_args(package))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pip(index_url: Option<&str>, extra: Option<&str>) -> Pip {
        Pip {
            program: PathBuf::from("/usr/bin/python3"),
            base_args: vec!["-m".to_string(), "pip".to_string()],
            index_url: index_url.map(str::to_string),
            extra_index_url: extra.map(str::to_string),
        }
    }

    #[test]
    fn test_install_args() {
        assert_eq!(
            pip(None, None).install_args("vsdkx-model-yolo"),
            vec!["-m", "pip", "install", "vsdkx-model-yolo"]
        );
    }

    #[test]
    fn test_install_args_with_indexes() {
        assert_eq!(
            pip(Some("https://a/simple"), Some("https://b/simple")).install_args("pkg"),
            vec![
                "-m",
                "pip",
                "install",
                "pkg",
                "--index-url",
                "https://a/simple",
                "--extra-index-url",
                "https://b/simple"
            ]
        );
    }

    #[test]
    fn test_uninstall_args() {
        assert_eq!(
            pip(Some("https://a/simple"), None).uninstall_args("vsdkx-model-yolo"),
            vec!["-m", "pip", "uninstall", "-y", "vsdkx-model-yolo"]
        );
    }

    #[test]
    fn test_missing_program() {
        let config = PackageManagerConfig {
            program: "definitely-not-a-real-pip-binary".to_string(),
            ..PackageManagerConfig::default()
        };
        assert!(matches!(
            Pip::from_config(&config),
            Err(VsdkxError::PackageManager(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_error() {
        let pip = Pip {
            program: PathBuf::from("false"),
            base_args: Vec::new(),
            index_url: None,
            extra_index_url: None,
        };
        assert!(matches!(
            pip.install("pkg"),
            Err(VsdkxError::PackageManager(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_zero_exit_is_success() {
        let pip = Pip {
            program: PathBuf::from("true"),
            base_args: Vec::new(),
            index_url: None,
            extra_index_url: None,
        };
        assert!(pip.uninstall("pkg").is_ok());
    }
}
