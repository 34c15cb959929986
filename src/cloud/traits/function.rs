// ABOUTME: Serverless function operations trait.
// ABOUTME: Replace code, observe readiness, and publish immutable versions.

use super::sealed::Sealed;
use super::shared_types::{FunctionVersion, Readiness};
use crate::types::FunctionName;
use async_trait::async_trait;
use bytes::Bytes;

/// Function platform operations: update code, check readiness, publish.
#[async_trait]
pub trait FunctionOps: Sealed + Send + Sync {
    /// Replace the function's unpublished code with a zip archive.
    async fn update_function_code(
        &self,
        name: &FunctionName,
        archive: Bytes,
    ) -> Result<(), FunctionError>;

    /// Report whether the last code update has finished processing.
    async fn function_readiness(&self, name: &FunctionName) -> Result<Readiness, FunctionError>;

    /// Snapshot the current code as a new immutable version.
    async fn publish_version(&self, name: &FunctionName) -> Result<FunctionVersion, FunctionError>;
}

/// Errors from function platform operations.
#[derive(Debug, thiserror::Error)]
pub enum FunctionError {
    #[error("function not found: {0}")]
    NotFound(String),

    #[error("another update is in progress for function: {0}")]
    UpdateInProgress(String),

    #[error("archive rejected: {0}")]
    InvalidArchive(String),

    #[error("function platform error: {0}")]
    Platform(String),
}
