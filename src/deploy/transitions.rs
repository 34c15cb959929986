// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use tracing::info;

use super::Deployment;
use super::error::DeployError;
use super::function::deploy_function;
use super::invalidate::{InvalidationOutcome, caller_reference, invalidate};
use super::package;
use super::pipeline::DeployReport;
use super::publish::publish_assets;
use super::state::{
    AssetsPublished, Completed, FunctionPublished, Initialized, Packaged, TriggerBound,
};
use super::trigger::bind_trigger;
use super::workspace::Workspace;
use crate::cloud::{EdgeOps, FunctionOps, ObjectStoreOps};
use crate::diagnostics::Warning;

impl<S> Deployment<S> {
    /// Internal helper to move to the next state, carrying config and diagnostics.
    fn advance<T>(self, next: impl FnOnce(S) -> T) -> Deployment<T> {
        Deployment {
            config: self.config,
            diagnostics: self.diagnostics,
            started_at: self.started_at,
            state: next(self.state),
        }
    }
}

// =============================================================================
// Initialized -> Packaged
// =============================================================================

impl Deployment<Initialized> {
    /// Stage the server output (and prerendered pages) into a fresh
    /// workspace and zip it.
    ///
    /// # Errors
    ///
    /// `DeployError::Io` if the build output cannot be read,
    /// `DeployError::Write` if the workspace or archive cannot be written.
    #[must_use = "deployment state must be used"]
    pub async fn package(self) -> Result<Deployment<Packaged>, DeployError> {
        let build = &self.config.build;
        let workspace = Workspace::create(&build.output_dir)?;
        let bundle = workspace
            .stage_bundle(&build.server_dir, build.prerendered_dir.as_deref(), &[])
            .await?;
        let summary = package::package(&bundle, &workspace.archive_path()).await?;

        Ok(self.advance(|_| Packaged {
            workspace,
            package: summary,
        }))
    }
}

// =============================================================================
// Packaged -> AssetsPublished
// =============================================================================

impl Deployment<Packaged> {
    /// Upload the static asset tree. Per-file failures become warnings
    /// unless strict mode is on.
    #[must_use = "deployment state must be used"]
    pub async fn publish_assets<O: ObjectStoreOps>(
        mut self,
        store: &O,
    ) -> Result<Deployment<AssetsPublished>, DeployError> {
        let target = &self.config.deployment.object_store;
        let uploads = publish_assets(
            store,
            &self.config.build.static_dir,
            &target.bucket,
            target.prefix.as_ref(),
            &self.config.publish,
        )
        .await?;

        for failure in &uploads.failed {
            self.diagnostics.warn(Warning::asset_upload(format!(
                "asset {} was not uploaded: {}",
                failure.key, failure.reason
            )));
        }

        Ok(self.advance(|state| AssetsPublished {
            workspace: state.workspace,
            package: state.package,
            uploads,
        }))
    }
}

// =============================================================================
// AssetsPublished -> FunctionPublished
// =============================================================================

impl Deployment<AssetsPublished> {
    /// Replace the function code with the packaged archive and publish a
    /// version. The workspace is released afterwards.
    #[must_use = "deployment state must be used"]
    pub async fn publish_function<F: FunctionOps>(
        self,
        functions: &F,
    ) -> Result<Deployment<FunctionPublished>, DeployError> {
        let version = deploy_function(
            functions,
            &self.config.deployment.function.name,
            &self.state.workspace.archive_path(),
            &self.config.function_update,
        )
        .await?;

        Ok(self.advance(|state| FunctionPublished {
            package: state.package,
            uploads: state.uploads,
            version,
        }))
    }
}

// =============================================================================
// FunctionPublished -> TriggerBound
// =============================================================================

impl Deployment<FunctionPublished> {
    /// Point the distribution's trigger for the configured event type at
    /// the new version.
    #[must_use = "deployment state must be used"]
    pub async fn bind_trigger<E: EdgeOps>(
        self,
        edge: &E,
    ) -> Result<Deployment<TriggerBound>, DeployError> {
        let binding = bind_trigger(
            edge,
            &self.config.deployment.edge.distribution_id,
            &self.state.version,
            &self.config.trigger,
        )
        .await?;

        Ok(self.advance(|state| TriggerBound {
            package: state.package,
            uploads: state.uploads,
            version: state.version,
            binding,
        }))
    }
}

// =============================================================================
// TriggerBound -> Completed
// =============================================================================

impl Deployment<TriggerBound> {
    /// Request cache invalidation. Never fails the deployment: a rejected
    /// request is recorded as a warning.
    #[must_use = "deployment state must be used"]
    pub async fn invalidate<E: EdgeOps>(mut self, edge: &E) -> Deployment<Completed> {
        let settings = &self.config.invalidation;
        let outcome = if !settings.enabled {
            info!("Cache invalidation disabled, skipping");
            InvalidationOutcome::Skipped
        } else {
            let reference = caller_reference();
            let result = invalidate(
                edge,
                &self.config.deployment.edge.distribution_id,
                &settings.paths,
                &reference,
            )
            .await;

            match result {
                Ok(id) => InvalidationOutcome::Submitted {
                    id,
                    caller_reference: reference,
                },
                Err(e) => {
                    self.diagnostics.warn(Warning::invalidation(format!(
                        "{}; edge caches may serve stale content",
                        e
                    )));
                    InvalidationOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            }
        };

        self.advance(|state| Completed {
            package: state.package,
            uploads: state.uploads,
            version: state.version,
            binding: state.binding,
            invalidation: outcome,
        })
    }
}

// =============================================================================
// Completed
// =============================================================================

impl Deployment<Completed> {
    /// Summarize the run.
    pub fn finish(self) -> DeployReport {
        let deployment = &self.config.deployment;
        DeployReport {
            bucket: deployment.object_store.bucket.to_string(),
            prefix: deployment.object_store.prefix.as_ref().map(|p| p.to_string()),
            function: deployment.function.name.to_string(),
            distribution: deployment.edge.distribution_id.to_string(),
            archive_files: self.state.package.files,
            archive_bytes: self.state.package.bytes,
            uploads: self.state.uploads,
            function_version: self.state.version,
            trigger: self.state.binding,
            invalidation: self.state.invalidation,
            warnings: self.diagnostics.into_warnings(),
            started_at: self.started_at,
            finished_at: chrono::Utc::now(),
        }
    }
}
