pub mod client;

use crate::error::ObjectStoreError;

pub use client::S3Client;

/// Read access to a bucket/object store
pub trait ObjectStore {
    /// Fetch the full contents of `key` in `bucket`
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError>;
}
