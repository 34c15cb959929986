// ABOUTME: Pipeline driver running every deployment stage in order.
// ABOUTME: Reports stage progress to a callback and returns a serializable summary.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Deployment;
use super::error::{DeployError, DeployErrorKind};
use super::invalidate::InvalidationOutcome;
use super::publish::UploadReport;
use super::trigger::TriggerBinding;
use crate::cloud::{Cloud, EdgeOps, FunctionOps, FunctionVersion, ObjectStoreOps};
use crate::config::Config;
use crate::diagnostics::Warning;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Package,
    PublishAssets,
    PublishFunction,
    BindTrigger,
    Invalidate,
}

impl Stage {
    pub fn description(&self) -> &'static str {
        match self {
            Stage::Package => "Packaging server bundle",
            Stage::PublishAssets => "Uploading static assets",
            Stage::PublishFunction => "Publishing function version",
            Stage::BindTrigger => "Binding edge trigger",
            Stage::Invalidate => "Invalidating edge cache",
        }
    }
}

/// Summary of a completed deployment.
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    pub bucket: String,
    pub prefix: Option<String>,
    pub function: String,
    pub distribution: String,
    pub archive_files: usize,
    pub archive_bytes: u64,
    pub uploads: UploadReport,
    pub function_version: FunctionVersion,
    pub trigger: TriggerBinding,
    pub invalidation: InvalidationOutcome,
    pub warnings: Vec<Warning>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// A failed run: the stage error plus the warnings gathered before it.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct DeployFailure {
    pub error: DeployError,
    pub warnings: Vec<Warning>,
}

impl DeployFailure {
    pub fn kind(&self) -> DeployErrorKind {
        self.error.kind()
    }
}

impl From<DeployError> for DeployFailure {
    fn from(error: DeployError) -> Self {
        Self {
            error,
            warnings: Vec::new(),
        }
    }
}

/// Run package, asset upload, function publish, trigger binding, and
/// cache invalidation against `cloud`.
///
/// `on_stage` is called as each stage starts. The first failing stage ends
/// the run; stages already completed are not rolled back. Warnings raised
/// before the failure travel with it.
pub async fn run_pipeline<S, F, E>(
    config: Config,
    cloud: &Cloud<S, F, E>,
    mut on_stage: impl FnMut(Stage),
) -> Result<DeployReport, DeployFailure>
where
    S: ObjectStoreOps,
    F: FunctionOps,
    E: EdgeOps,
{
    let deployment = Deployment::new(config);

    on_stage(Stage::Package);
    let deployment = deployment.package().await?;

    on_stage(Stage::PublishAssets);
    let deployment = deployment.publish_assets(&cloud.store).await?;

    // Nothing warns again until invalidation.
    let carried = deployment.diagnostics().warnings().to_vec();
    let failed = |error| DeployFailure {
        error,
        warnings: carried.clone(),
    };

    on_stage(Stage::PublishFunction);
    let deployment = deployment
        .publish_function(&cloud.functions)
        .await
        .map_err(failed)?;

    on_stage(Stage::BindTrigger);
    let deployment = deployment.bind_trigger(&cloud.edge).await.map_err(failed)?;

    on_stage(Stage::Invalidate);
    let deployment = deployment.invalidate(&cloud.edge).await;

    Ok(deployment.finish())
}
