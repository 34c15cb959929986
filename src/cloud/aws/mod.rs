// ABOUTME: AWS backends: S3 for assets, Lambda for the server, CloudFront for the edge.
// ABOUTME: Each client is bound to its tier's region at construction.

mod cloudfront;
mod lambda;
mod s3;

pub use cloudfront::CloudFrontEdge;
pub use lambda::LambdaFunctions;
pub use s3::S3Store;

use super::Cloud;
use crate::config::DeploymentConfig;
use crate::types::Region;

/// The three AWS tiers a deployment touches.
pub type AwsCloud = Cloud<S3Store, LambdaFunctions, CloudFrontEdge>;

impl AwsCloud {
    /// Build clients for every tier using default credentials.
    ///
    /// Credentials come from the environment (AWS_ACCESS_KEY_ID,
    /// AWS_SECRET_ACCESS_KEY, profiles, or an IAM role).
    pub async fn connect(config: &DeploymentConfig) -> Self {
        let store = S3Store::connect(&config.object_store.region).await;
        let functions = LambdaFunctions::connect(&config.function.region).await;
        let edge = CloudFrontEdge::connect(&config.edge.region).await;
        Cloud::new(store, functions, edge)
    }
}

async fn load_sdk_config(region: &Region) -> aws_config::SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.as_str().to_string()))
        .load()
        .await
}
