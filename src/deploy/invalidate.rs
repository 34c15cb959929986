// ABOUTME: Cache invalidator: submits one invalidation covering a set of path patterns.
// ABOUTME: Returns once the request is accepted; does not wait for completion.

use chrono::Utc;
use nonempty::NonEmpty;
use serde::Serialize;
use tracing::info;

use super::error::DeployError;
use crate::cloud::EdgeOps;
use crate::types::{DistributionId, InvalidationId, PathPattern};

/// What happened to the cache invalidation step of a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvalidationOutcome {
    Submitted {
        id: InvalidationId,
        caller_reference: String,
    },
    Skipped,
    Failed {
        reason: String,
    },
}

/// A caller reference unique per host and millisecond.
///
/// Two requests from the same host in the same millisecond would share a
/// reference and the platform would treat the second as a duplicate.
pub fn caller_reference() -> String {
    let host = gethostname::gethostname().to_string_lossy().into_owned();
    format!("{}-{}", host, Utc::now().timestamp_millis())
}

pub async fn invalidate<E: EdgeOps>(
    edge: &E,
    distribution: &DistributionId,
    paths: &NonEmpty<PathPattern>,
    caller_reference: &str,
) -> Result<InvalidationId, DeployError> {
    let id = edge
        .create_invalidation(distribution, paths, caller_reference)
        .await
        .map_err(|e| DeployError::Invalidation(e.to_string()))?;

    info!(
        distribution = %distribution,
        invalidation = %id,
        paths = paths.len(),
        caller_reference,
        "Submitted cache invalidation"
    );
    Ok(id)
}
