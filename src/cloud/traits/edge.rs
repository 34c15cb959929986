// ABOUTME: Edge distribution operations trait.
// ABOUTME: Token-guarded config read/write plus cache invalidation requests.

use super::sealed::Sealed;
use super::shared_types::{ConcurrencyToken, TriggerAssociation, VersionedConfig};
use crate::types::{DistributionId, InvalidationId, PathPattern};
use async_trait::async_trait;
use nonempty::NonEmpty;

/// A backend distribution configuration seen through the one section the
/// trigger binder owns.
///
/// Implementations must preserve every other part of the configuration when
/// the trigger list is replaced.
pub trait TriggerConfig {
    /// The default cache behavior's trigger associations.
    ///
    /// Returns `EdgeError::MissingSection` when the configuration has no
    /// default behavior at all.
    fn default_triggers(&self) -> Result<Vec<TriggerAssociation>, EdgeError>;

    /// Replace the default cache behavior's trigger associations.
    fn set_default_triggers(&mut self, triggers: Vec<TriggerAssociation>)
    -> Result<(), EdgeError>;
}

/// Edge platform operations.
#[async_trait]
pub trait EdgeOps: Sealed + Send + Sync {
    /// The backend's full distribution configuration type.
    type Config: TriggerConfig + Send + Sync;

    /// Fetch the distribution configuration together with its concurrency token.
    async fn get_distribution_config(
        &self,
        id: &DistributionId,
    ) -> Result<VersionedConfig<Self::Config>, EdgeError>;

    /// Write the configuration if `token` still matches the current one.
    ///
    /// Returns the new token, or `EdgeError::Conflict` on mismatch.
    async fn update_distribution_config(
        &self,
        id: &DistributionId,
        config: Self::Config,
        token: &ConcurrencyToken,
    ) -> Result<ConcurrencyToken, EdgeError>;

    /// Request invalidation of cached responses matching `paths`.
    async fn create_invalidation(
        &self,
        id: &DistributionId,
        paths: &NonEmpty<PathPattern>,
        caller_reference: &str,
    ) -> Result<InvalidationId, EdgeError>;
}

/// Errors from edge platform operations.
#[derive(Debug, thiserror::Error)]
pub enum EdgeError {
    #[error("distribution not found: {0}")]
    NotFound(String),

    #[error("missing required configuration section: {0}")]
    MissingSection(String),

    #[error("malformed distribution configuration: {0}")]
    Malformed(String),

    #[error("concurrency token mismatch for distribution {0}")]
    Conflict(String),

    #[error("edge platform error: {0}")]
    Platform(String),
}

impl EdgeError {
    /// Whether re-running the read-modify-write cycle could succeed.
    pub fn is_conflict(&self) -> bool {
        matches!(self, EdgeError::Conflict(_))
    }
}
