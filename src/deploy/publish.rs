// ABOUTME: Asset publisher: uploads a static asset tree to object storage.
// ABOUTME: Bounded concurrent uploads, best-effort or strict failure handling.

use std::path::Path;

use bytes::Bytes;
use futures::{StreamExt, TryStreamExt, stream};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::content_type::content_type_for;
use super::error::DeployError;
use super::walk::{WalkEntry, collect_files};
use crate::cloud::ObjectStoreOps;
use crate::config::PublishSettings;
use crate::types::{BucketName, KeyPrefix};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedObject {
    pub key: String,
    pub content_type: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadFailure {
    pub key: String,
    pub reason: String,
}

impl From<UploadFailure> for DeployError {
    fn from(failure: UploadFailure) -> Self {
        DeployError::AssetUpload {
            key: failure.key,
            reason: failure.reason,
        }
    }
}

/// Per-file outcomes of one publish, each list sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    pub uploaded: Vec<UploadedObject>,
    pub failed: Vec<UploadFailure>,
}

impl UploadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn bytes_uploaded(&self) -> u64 {
        self.uploaded.iter().map(|o| o.size).sum()
    }
}

/// Object key for a file at `relative` under the optional prefix.
pub fn object_key(prefix: Option<&KeyPrefix>, relative: &str) -> String {
    match prefix {
        Some(prefix) => prefix.join(relative),
        None => relative.to_string(),
    }
}

/// Upload every regular file under `directory` to `bucket`.
///
/// In best-effort mode per-file failures are collected into the report and
/// the remaining files are still uploaded. In strict mode the first failure
/// is returned as `DeployError::AssetUpload`.
pub async fn publish_assets<S: ObjectStoreOps>(
    store: &S,
    directory: &Path,
    bucket: &BucketName,
    prefix: Option<&KeyPrefix>,
    settings: &PublishSettings,
) -> Result<UploadReport, DeployError> {
    let root = directory.to_path_buf();
    let entries = tokio::task::spawn_blocking(move || collect_files(&root, &[]))
        .await
        .map_err(|e| DeployError::Io {
            path: directory.to_path_buf(),
            source: std::io::Error::other(e),
        })?
        .map_err(|e| DeployError::Io {
            path: e.path,
            source: e.source,
        })?;

    info!(
        bucket = %bucket,
        files = entries.len(),
        concurrency = settings.concurrency,
        "Publishing static assets"
    );

    let uploads = stream::iter(entries)
        .map(|entry| upload_one(store, bucket, prefix, entry))
        .buffer_unordered(settings.concurrency.max(1));

    let mut report = if settings.strict {
        let uploaded: Vec<UploadedObject> = uploads.map_err(DeployError::from).try_collect().await?;
        UploadReport {
            uploaded,
            failed: Vec::new(),
        }
    } else {
        let mut report = UploadReport::default();
        let results: Vec<_> = uploads.collect().await;
        for result in results {
            match result {
                Ok(object) => report.uploaded.push(object),
                Err(failure) => report.failed.push(failure),
            }
        }
        report
    };

    report.uploaded.sort_by(|a, b| a.key.cmp(&b.key));
    report.failed.sort_by(|a, b| a.key.cmp(&b.key));

    info!(
        uploaded = report.uploaded.len(),
        failed = report.failed.len(),
        bytes = report.bytes_uploaded(),
        "Static assets published"
    );
    Ok(report)
}

async fn upload_one<S: ObjectStoreOps>(
    store: &S,
    bucket: &BucketName,
    prefix: Option<&KeyPrefix>,
    entry: WalkEntry,
) -> Result<UploadedObject, UploadFailure> {
    let key = object_key(prefix, &entry.relative);
    let content_type = content_type_for(&entry.relative);

    let body = match tokio::fs::read(&entry.path).await {
        Ok(data) => Bytes::from(data),
        Err(e) => {
            warn!(path = %entry.path.display(), error = %e, "Failed to read asset");
            return Err(UploadFailure {
                key,
                reason: format!("read {}: {}", entry.path.display(), e),
            });
        }
    };
    let size = body.len() as u64;

    match store.put_object(bucket, &key, body, content_type).await {
        Ok(()) => {
            debug!(key = %key, content_type, size, "Uploaded asset");
            Ok(UploadedObject {
                key,
                content_type: content_type.to_string(),
                size,
            })
        }
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to upload asset");
            Err(UploadFailure {
                key,
                reason: e.to_string(),
            })
        }
    }
}
