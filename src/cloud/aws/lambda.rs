// ABOUTME: Lambda implementation of function platform operations.
// ABOUTME: UpdateFunctionCode, GetFunctionConfiguration polling, and PublishVersion.

use async_trait::async_trait;
use aws_sdk_lambda::Client;
use aws_sdk_lambda::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{LastUpdateStatus, State};
use bytes::Bytes;

use super::load_sdk_config;
use crate::cloud::traits::sealed::Sealed;
use crate::cloud::traits::{FunctionError, FunctionOps, FunctionVersion, Readiness};
use crate::types::{FunctionName, Region};

/// Lambda-backed function platform.
pub struct LambdaFunctions {
    client: Client,
}

impl LambdaFunctions {
    pub async fn connect(region: &Region) -> Self {
        let config = load_sdk_config(region).await;
        Self {
            client: Client::new(&config),
        }
    }
}

fn classify<E>(name: &FunctionName, err: &E) -> FunctionError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    match err.code() {
        Some("ResourceNotFoundException") => FunctionError::NotFound(name.to_string()),
        Some("ResourceConflictException") => FunctionError::UpdateInProgress(name.to_string()),
        Some("InvalidParameterValueException") | Some("CodeStorageExceededException") => {
            FunctionError::InvalidArchive(DisplayErrorContext(err).to_string())
        }
        _ => FunctionError::Platform(DisplayErrorContext(err).to_string()),
    }
}

/// PublishVersion returns the version-qualified ARN; strip the version.
fn unqualified_arn<'a>(arn: &'a str, version: &str) -> &'a str {
    arn.strip_suffix(version)
        .and_then(|rest| rest.strip_suffix(':'))
        .unwrap_or(arn)
}

impl Sealed for LambdaFunctions {}

#[async_trait]
impl FunctionOps for LambdaFunctions {
    async fn update_function_code(
        &self,
        name: &FunctionName,
        archive: Bytes,
    ) -> Result<(), FunctionError> {
        self.client
            .update_function_code()
            .function_name(name.as_str())
            .zip_file(Blob::new(archive.to_vec()))
            .send()
            .await
            .map_err(|e| classify(name, &e))?;
        Ok(())
    }

    async fn function_readiness(&self, name: &FunctionName) -> Result<Readiness, FunctionError> {
        let output = self
            .client
            .get_function_configuration()
            .function_name(name.as_str())
            .send()
            .await
            .map_err(|e| classify(name, &e))?;

        match output.last_update_status() {
            Some(LastUpdateStatus::InProgress) => return Ok(Readiness::Pending),
            Some(LastUpdateStatus::Failed) => {
                let reason = output
                    .last_update_status_reason()
                    .unwrap_or("code update failed");
                return Ok(Readiness::Failed(reason.to_string()));
            }
            _ => {}
        }

        Ok(match output.state() {
            Some(State::Pending) => Readiness::Pending,
            Some(State::Failed) => Readiness::Failed(
                output
                    .state_reason()
                    .unwrap_or("function is in a failed state")
                    .to_string(),
            ),
            _ => Readiness::Ready,
        })
    }

    async fn publish_version(&self, name: &FunctionName) -> Result<FunctionVersion, FunctionError> {
        let output = self
            .client
            .publish_version()
            .function_name(name.as_str())
            .send()
            .await
            .map_err(|e| classify(name, &e))?;

        let version = output
            .version()
            .ok_or_else(|| FunctionError::Platform("publish returned no version".to_string()))?
            .to_string();
        let qualified = output
            .function_arn()
            .ok_or_else(|| FunctionError::Platform("publish returned no ARN".to_string()))?;

        let function_arn = unqualified_arn(qualified, &version);

        Ok(FunctionVersion {
            function_arn: function_arn.to_string(),
            version,
        })
    }
}
