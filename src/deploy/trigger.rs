// ABOUTME: Edge trigger binder: points the default behavior's trigger at a new function version.
// ABOUTME: Token-guarded read-modify-write, retried with backoff on conflicts only.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::error::DeployError;
use crate::cloud::{EdgeError, EdgeOps, FunctionVersion, TriggerAssociation, TriggerConfig};
use crate::config::TriggerSettings;
use crate::types::DistributionId;

/// Result of a successful bind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerBinding {
    pub association: TriggerAssociation,
    /// ARN previously bound to the same event type, if any.
    pub replaced: Option<String>,
    /// Read-modify-write cycles it took, including the successful one.
    pub attempts: usize,
}

/// Replace-by-key merge on event type: drop every association for the new
/// one's event type and append the new one. Other associations keep their
/// relative order.
pub fn replace_trigger(
    existing: Vec<TriggerAssociation>,
    association: TriggerAssociation,
) -> Vec<TriggerAssociation> {
    let mut merged: Vec<_> = existing
        .into_iter()
        .filter(|t| t.event_type != association.event_type)
        .collect();
    merged.push(association);
    merged
}

fn backoff(settings: &TriggerSettings) -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(settings.min_delay)
        .with_max_delay(settings.max_delay)
        .with_max_times(settings.max_attempts.saturating_sub(1))
        .with_jitter()
}

/// Bind `version` to the configured event type on the distribution's
/// default cache behavior, leaving the rest of the configuration intact.
pub async fn bind_trigger<E: EdgeOps>(
    edge: &E,
    distribution: &DistributionId,
    version: &FunctionVersion,
    settings: &TriggerSettings,
) -> Result<TriggerBinding, DeployError> {
    let association = TriggerAssociation {
        event_type: settings.event_type,
        function_arn: version.qualified_arn(),
        include_body: settings.include_body,
    };

    let counter = AtomicUsize::new(0);
    let attempts = &counter;
    let target = &association;

    let result = (|| async move {
        attempts.fetch_add(1, Ordering::Relaxed);
        bind_once(edge, distribution, target).await
    })
    .retry(backoff(settings))
    .when(EdgeError::is_conflict)
    .notify(|err: &EdgeError, dur: Duration| {
        warn!(distribution = %distribution, error = %err, delay = ?dur, "Trigger update conflicted, retrying");
    })
    .await;

    let attempts = counter.load(Ordering::Relaxed);
    match result {
        Ok(replaced) => {
            info!(
                distribution = %distribution,
                event_type = %association.event_type,
                arn = %association.function_arn,
                attempts,
                "Bound edge trigger"
            );
            Ok(TriggerBinding {
                association,
                replaced,
                attempts,
            })
        }
        Err(EdgeError::Conflict(_)) => Err(DeployError::Conflict {
            distribution: distribution.to_string(),
            attempts,
        }),
        Err(EdgeError::MissingSection(section)) => Err(DeployError::MissingSection(section)),
        Err(e) => Err(DeployError::Edge(e.to_string())),
    }
}

/// The triggers currently bound on the distribution's default behavior.
pub async fn current_triggers<E: EdgeOps>(
    edge: &E,
    distribution: &DistributionId,
) -> Result<Vec<TriggerAssociation>, DeployError> {
    let versioned = edge
        .get_distribution_config(distribution)
        .await
        .map_err(|e| DeployError::Edge(e.to_string()))?;
    versioned.config.default_triggers().map_err(|e| match e {
        EdgeError::MissingSection(section) => DeployError::MissingSection(section),
        other => DeployError::Edge(other.to_string()),
    })
}

/// One read-modify-write cycle. The write is conditioned on the token from
/// this cycle's read, so any change in between surfaces as a conflict.
async fn bind_once<E: EdgeOps>(
    edge: &E,
    distribution: &DistributionId,
    association: &TriggerAssociation,
) -> Result<Option<String>, EdgeError> {
    let versioned = edge.get_distribution_config(distribution).await?;
    let mut config = versioned.config;

    let existing = config.default_triggers()?;
    let replaced = existing
        .iter()
        .find(|t| t.event_type == association.event_type)
        .map(|t| t.function_arn.clone());

    config.set_default_triggers(replace_trigger(existing, association.clone()))?;
    debug!(
        distribution = %distribution,
        token = %versioned.token,
        "Submitting distribution update"
    );
    edge.update_distribution_config(distribution, config, &versioned.token)
        .await?;
    Ok(replaced)
}
