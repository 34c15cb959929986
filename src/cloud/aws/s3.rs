// ABOUTME: S3 implementation of object storage operations.
// ABOUTME: One PutObject per file with an explicit content type.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::debug;

use super::load_sdk_config;
use crate::cloud::traits::sealed::Sealed;
use crate::cloud::traits::{ObjectStoreError, ObjectStoreOps};
use crate::types::{BucketName, Region};

/// S3-backed object store.
pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub async fn connect(region: &Region) -> Self {
        let config = load_sdk_config(region).await;
        Self {
            client: Client::new(&config),
        }
    }
}

impl Sealed for S3Store {}

#[async_trait]
impl ObjectStoreOps for S3Store {
    async fn put_object(
        &self,
        bucket: &BucketName,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), ObjectStoreError> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(bucket.as_str())
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| match e.code() {
                Some("NoSuchBucket") => ObjectStoreError::BucketNotFound(bucket.to_string()),
                Some("AccessDenied") => ObjectStoreError::AccessDenied(key.to_string()),
                _ => ObjectStoreError::UploadFailed(DisplayErrorContext(&e).to_string()),
            })?;

        debug!(bucket = %bucket, key, size, content_type, "Stored object in S3");
        Ok(())
    }
}
