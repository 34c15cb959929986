// ABOUTME: Function deployer: replaces function code and publishes an immutable version.
// ABOUTME: Polls readiness between the two phases instead of sleeping a fixed time.

use std::path::Path;

use bytes::Bytes;
use tokio::time::Instant;
use tracing::{debug, info};

use super::error::DeployError;
use crate::cloud::{FunctionOps, FunctionVersion, Readiness};
use crate::config::FunctionUpdateSettings;
use crate::types::FunctionName;

/// Upload `archive_path` as the new code of `name`, wait for it to settle,
/// then publish a version.
///
/// No retries: an update already in progress fails the call.
pub async fn deploy_function<F: FunctionOps>(
    functions: &F,
    name: &FunctionName,
    archive_path: &Path,
    settings: &FunctionUpdateSettings,
) -> Result<FunctionVersion, DeployError> {
    let archive = tokio::fs::read(archive_path)
        .await
        .map_err(|source| DeployError::Io {
            path: archive_path.to_path_buf(),
            source,
        })?;

    info!(function = %name, size = archive.len(), "Updating function code");
    functions
        .update_function_code(name, Bytes::from(archive))
        .await
        .map_err(|e| DeployError::FunctionUpdate(e.to_string()))?;

    wait_until_ready(functions, name, settings).await?;

    let version = functions
        .publish_version(name)
        .await
        .map_err(|e| DeployError::FunctionPublish(e.to_string()))?;

    info!(
        function = %name,
        version = %version.version,
        arn = %version.qualified_arn(),
        "Published function version"
    );
    Ok(version)
}

async fn wait_until_ready<F: FunctionOps>(
    functions: &F,
    name: &FunctionName,
    settings: &FunctionUpdateSettings,
) -> Result<(), DeployError> {
    let deadline = Instant::now() + settings.settle_timeout;

    loop {
        let readiness = functions
            .function_readiness(name)
            .await
            .map_err(|e| DeployError::FunctionPublish(e.to_string()))?;

        match readiness {
            Readiness::Ready => return Ok(()),
            Readiness::Failed(reason) => {
                return Err(DeployError::FunctionPublish(format!(
                    "code update for {} failed: {}",
                    name, reason
                )));
            }
            Readiness::Pending => {}
        }

        if Instant::now() >= deadline {
            return Err(DeployError::FunctionPublish(format!(
                "function {} did not become ready within {:?}",
                name, settings.settle_timeout
            )));
        }

        debug!(function = %name, "Code update still processing");
        tokio::time::sleep(settings.poll_interval).await;
    }
}
