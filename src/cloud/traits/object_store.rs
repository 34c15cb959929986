// ABOUTME: Object storage operations trait.
// ABOUTME: Single-object PUT with content type, the only call the asset publisher needs.

use super::sealed::Sealed;
use crate::types::BucketName;
use async_trait::async_trait;
use bytes::Bytes;

/// Object storage operations.
#[async_trait]
pub trait ObjectStoreOps: Sealed + Send + Sync {
    /// Store `body` under `key`, overwriting any existing object.
    async fn put_object(
        &self,
        bucket: &BucketName,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), ObjectStoreError>;
}

/// Errors from object storage operations.
#[derive(Debug, thiserror::Error)]
pub enum ObjectStoreError {
    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    #[error("access denied for key: {0}")]
    AccessDenied(String),

    #[error("upload failed: {0}")]
    UploadFailed(String),
}
