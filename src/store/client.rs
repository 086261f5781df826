use crate::credentials::Credentials;
use crate::error::ObjectStoreError;
use crate::store::ObjectStore;
use s3::bucket::Bucket;
use s3::creds::Credentials as BucketCredentials;
use s3::region::Region;
use serde::Deserialize;
use std::time::Duration;

/// Path-style S3 client (works with MinIO and AWS)
///
/// The endpoint is checked on first use, so a bad endpoint surfaces as an
/// object store failure of the command that needs it.
pub struct S3Client {
    endpoint: String,
    region: String,
    access_key: String,
    secret_key: String,
    secure: bool,
    timeout: Duration,
}

impl std::fmt::Debug for S3Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Client")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .field("secure", &self.secure)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Body of an S3 error response (`<Error><Code>..</Code><Message>..</Message></Error>`)
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

impl S3Client {
    /// Client for `credentials.endpoint` (`host[:port]`, no scheme)
    #[must_use]
    pub fn new(credentials: &Credentials, timeout: Duration) -> Self {
        Self {
            endpoint: credentials.endpoint.clone(),
            region: credentials.region.clone(),
            access_key: credentials.access_key.clone(),
            secret_key: credentials.secret_key.clone(),
            secure: credentials.secure,
            timeout,
        }
    }

    fn region(&self) -> Result<Region, ObjectStoreError> {
        let endpoint = self.endpoint.trim().trim_end_matches('/');
        if endpoint.is_empty() || endpoint.contains("://") || endpoint.contains('/') {
            return Err(ObjectStoreError::InvalidEndpoint(self.endpoint.clone()));
        }

        let scheme = if self.secure { "https" } else { "http" };
        Ok(Region::Custom {
            region: self.region.clone(),
            endpoint: format!("{scheme}://{endpoint}"),
        })
    }

    fn bucket(&self, name: &str) -> Result<Box<Bucket>, ObjectStoreError> {
        let region = self.region()?;
        let credentials = BucketCredentials::new(
            Some(&self.access_key),
            Some(&self.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| ObjectStoreError::Client(e.to_string()))?;

        let mut bucket = Bucket::new(name, region, credentials)
            .map_err(|e| ObjectStoreError::Client(e.to_string()))?
            .with_path_style();
        bucket.set_request_timeout(Some(self.timeout));
        Ok(Box::new(bucket))
    }
}

impl ObjectStore for S3Client {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        let bucket = self.bucket(bucket)?;
        tracing::debug!("GET {}/{key}", bucket.url());

        let response = bucket
            .get_object(key)
            .map_err(|e| ObjectStoreError::Transport(e.to_string()))?;

        let status = response.status_code();
        if (200..300).contains(&status) {
            return Ok(response.as_slice().to_vec());
        }

        Err(service_error(status, response.as_slice()))
    }
}

/// Build an error from an S3 error response
fn service_error(status: u16, body: &[u8]) -> ObjectStoreError {
    let parsed: ErrorBody = std::str::from_utf8(body)
        .ok()
        .and_then(|text| quick_xml::de::from_str(text).ok())
        .unwrap_or_default();

    let code = parsed.code.unwrap_or_else(|| match status {
        403 => "AccessDenied".to_string(),
        404 => "NotFound".to_string(),
        _ => "UnknownError".to_string(),
    });
    let message = parsed
        .message
        .unwrap_or_else(|| "no error message".to_string());

    ObjectStoreError::Service {
        status,
        code: code.trim().to_string(),
        message: message.trim().to_string(),
    }
}
