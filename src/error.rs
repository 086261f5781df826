use thiserror::Error;

/// Main error type for vsdkx-model
#[derive(Error, Debug)]
pub enum VsdkxError {
    #[error("Invalid model name: {0}\n\nTroubleshooting:\n- Use lowercase letters, digits and single hyphens (e.g. yolo-v5)\n- Names must not start or end with a hyphen")]
    Validation(String),

    #[error("Package manager error: {0}\n\nTroubleshooting:\n- Is pip available? Check [package_manager] in config\n- Verify the package index is reachable\n- Run the printed pip command by hand for details")]
    PackageManager(String),

    #[error("Object store error: {0}")]
    ObjectStore(#[from] ObjectStoreError),

    #[error("Model '{0}' has no section in the project profile\n\nTroubleshooting:\n- Check vsdkx/model/profile.yaml\n- Set missing_key = \"ignore\" under [profile] to tolerate this")]
    MissingKey(String),

    #[error("Document error: {0}\n\nTroubleshooting:\n- Check the YAML syntax of the file\n- The top level of the document must be a mapping")]
    Document(String),

    #[error("Config error: {0}\n\nTroubleshooting:\n- Check config file: ~/.config/vsdkx/config.toml\n- Run with RUST_LOG=debug for more details")]
    Config(String),

    #[error("Credentials error: {0}\n\nTroubleshooting:\n- Check secret file: ~/.config/vsdkx/secret.toml\n- Or export VSDKX_ENDPOINT, VSDKX_ACCESS_KEY and VSDKX_SECRET_KEY")]
    Credentials(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Object store failures
#[derive(Error, Debug)]
pub enum ObjectStoreError {
    #[error("Invalid endpoint '{0}': expected host[:port] without scheme")]
    InvalidEndpoint(String),

    #[error("Failed to configure object store client: {0}")]
    Client(String),

    #[error("Network error: {0}\n\nTroubleshooting:\n- Check the endpoint and the secure flag\n- Verify firewall settings\n- Try increasing timeout_secs under [object_store]")]
    Transport(String),

    #[error("{code} ({status}): {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
    },
}

impl VsdkxError {
    /// Process exit code for this error kind
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::PackageManager(_) => 3,
            Self::ObjectStore(_) => 4,
            Self::MissingKey(_) => 5,
            Self::Io(_) => 6,
            Self::Config(_) | Self::Credentials(_) => 7,
            Self::Document(_) => 8,
        }
    }
}

pub type Result<T> = std::result::Result<T, VsdkxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_kind() {
        let errors = [
            VsdkxError::Validation("x".into()),
            VsdkxError::PackageManager("x".into()),
            VsdkxError::ObjectStore(ObjectStoreError::Transport("x".into())),
            VsdkxError::MissingKey("x".into()),
            VsdkxError::Io(std::io::Error::other("x")),
            VsdkxError::Config("x".into()),
            VsdkxError::Document("x".into()),
        ];

        let mut codes: Vec<u8> = errors.iter().map(VsdkxError::exit_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(!codes.contains(&0));
    }

    #[test]
    fn test_service_error_display() {
        let err = ObjectStoreError::Service {
            status: 404,
            code: "NoSuchBucket".to_string(),
            message: "The specified bucket does not exist".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "NoSuchBucket (404): The specified bucket does not exist"
        );
    }
}
