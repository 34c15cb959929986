// ABOUTME: CloudFront implementation of edge operations.
// ABOUTME: ETag-guarded distribution updates and invalidation batches.

use async_trait::async_trait;
use aws_sdk_cloudfront::Client;
use aws_sdk_cloudfront::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_cloudfront::types::{
    DistributionConfig, EventType as SdkEventType, InvalidationBatch, LambdaFunctionAssociation,
    LambdaFunctionAssociations, Paths,
};
use nonempty::NonEmpty;

use super::load_sdk_config;
use crate::cloud::traits::sealed::Sealed;
use crate::cloud::traits::{
    ConcurrencyToken, EdgeError, EdgeOps, EventType, TriggerAssociation, TriggerConfig,
    VersionedConfig,
};
use crate::types::{DistributionId, InvalidationId, PathPattern, Region};

/// CloudFront-backed edge platform.
pub struct CloudFrontEdge {
    client: Client,
}

impl CloudFrontEdge {
    pub async fn connect(region: &Region) -> Self {
        let config = load_sdk_config(region).await;
        Self {
            client: Client::new(&config),
        }
    }
}

fn classify<E>(id: &DistributionId, err: &E) -> EdgeError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    match err.code() {
        Some("NoSuchDistribution") => EdgeError::NotFound(id.to_string()),
        Some("PreconditionFailed") => EdgeError::Conflict(id.to_string()),
        _ => EdgeError::Platform(DisplayErrorContext(err).to_string()),
    }
}

impl TriggerConfig for DistributionConfig {
    fn default_triggers(&self) -> Result<Vec<TriggerAssociation>, EdgeError> {
        let behavior = self
            .default_cache_behavior
            .as_ref()
            .ok_or_else(|| EdgeError::MissingSection("DefaultCacheBehavior".to_string()))?;

        behavior
            .lambda_function_associations
            .as_ref()
            .and_then(|associations| associations.items.as_ref())
            .into_iter()
            .flatten()
            .map(|item| {
                let event_type = item
                    .event_type
                    .as_str()
                    .parse::<EventType>()
                    .map_err(EdgeError::Malformed)?;
                Ok(TriggerAssociation {
                    event_type,
                    function_arn: item.lambda_function_arn.clone(),
                    include_body: item.include_body.unwrap_or(false),
                })
            })
            .collect()
    }

    fn set_default_triggers(
        &mut self,
        triggers: Vec<TriggerAssociation>,
    ) -> Result<(), EdgeError> {
        let behavior = self
            .default_cache_behavior
            .as_mut()
            .ok_or_else(|| EdgeError::MissingSection("DefaultCacheBehavior".to_string()))?;

        let items = triggers
            .iter()
            .map(|trigger| {
                LambdaFunctionAssociation::builder()
                    .lambda_function_arn(&trigger.function_arn)
                    .event_type(SdkEventType::from(trigger.event_type.as_str()))
                    .include_body(trigger.include_body)
                    .build()
                    .map_err(|e| EdgeError::Malformed(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let associations = LambdaFunctionAssociations::builder()
            .quantity(items.len() as i32)
            .set_items(Some(items))
            .build()
            .map_err(|e| EdgeError::Malformed(e.to_string()))?;

        behavior.lambda_function_associations = Some(associations);
        Ok(())
    }
}

impl Sealed for CloudFrontEdge {}

#[async_trait]
impl EdgeOps for CloudFrontEdge {
    type Config = DistributionConfig;

    async fn get_distribution_config(
        &self,
        id: &DistributionId,
    ) -> Result<VersionedConfig<DistributionConfig>, EdgeError> {
        let output = self
            .client
            .get_distribution_config()
            .id(id.as_str())
            .send()
            .await
            .map_err(|e| classify(id, &e))?;

        let token = output
            .e_tag
            .ok_or_else(|| EdgeError::Malformed("response carried no ETag".to_string()))?;
        let config = output
            .distribution_config
            .ok_or_else(|| EdgeError::MissingSection("DistributionConfig".to_string()))?;

        Ok(VersionedConfig {
            config,
            token: ConcurrencyToken::new(token),
        })
    }

    async fn update_distribution_config(
        &self,
        id: &DistributionId,
        config: DistributionConfig,
        token: &ConcurrencyToken,
    ) -> Result<ConcurrencyToken, EdgeError> {
        let output = self
            .client
            .update_distribution()
            .id(id.as_str())
            .if_match(token.as_str())
            .distribution_config(config)
            .send()
            .await
            .map_err(|e| classify(id, &e))?;

        output
            .e_tag
            .map(ConcurrencyToken::new)
            .ok_or_else(|| EdgeError::Malformed("update returned no ETag".to_string()))
    }

    async fn create_invalidation(
        &self,
        id: &DistributionId,
        paths: &NonEmpty<PathPattern>,
        caller_reference: &str,
    ) -> Result<InvalidationId, EdgeError> {
        let items: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
        let paths = Paths::builder()
            .quantity(items.len() as i32)
            .set_items(Some(items))
            .build()
            .map_err(|e| EdgeError::Malformed(e.to_string()))?;
        let batch = InvalidationBatch::builder()
            .paths(paths)
            .caller_reference(caller_reference)
            .build()
            .map_err(|e| EdgeError::Malformed(e.to_string()))?;

        let output = self
            .client
            .create_invalidation()
            .distribution_id(id.as_str())
            .invalidation_batch(batch)
            .send()
            .await
            .map_err(|e| classify(id, &e))?;

        let invalidation = output
            .invalidation
            .ok_or_else(|| EdgeError::Platform("response carried no invalidation".to_string()))?;
        Ok(InvalidationId::new(invalidation.id))
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_cloudfront::types::{DefaultCacheBehavior, ViewerProtocolPolicy};

    use super::*;
    use crate::deploy::replace_trigger;

    fn association(event_type: &str, arn: &str) -> LambdaFunctionAssociation {
        LambdaFunctionAssociation::builder()
            .lambda_function_arn(arn)
            .event_type(SdkEventType::from(event_type))
            .include_body(false)
            .build()
            .unwrap()
    }

    fn distribution(items: Vec<LambdaFunctionAssociation>) -> DistributionConfig {
        let associations = LambdaFunctionAssociations::builder()
            .quantity(items.len() as i32)
            .set_items(Some(items))
            .build()
            .unwrap();
        let behavior = DefaultCacheBehavior::builder()
            .target_origin_id("s3")
            .viewer_protocol_policy(ViewerProtocolPolicy::RedirectToHttps)
            .lambda_function_associations(associations)
            .build()
            .unwrap();
        DistributionConfig::builder()
            .caller_reference("ref-1")
            .comment("keep")
            .enabled(true)
            .default_cache_behavior(behavior)
            .build()
            .unwrap()
    }

    fn pairs(config: &DistributionConfig) -> (i32, Vec<(String, String)>) {
        let associations = config
            .default_cache_behavior
            .as_ref()
            .unwrap()
            .lambda_function_associations
            .as_ref()
            .unwrap();
        let items = associations
            .items
            .iter()
            .flatten()
            .map(|a| (a.event_type.as_str().to_string(), a.lambda_function_arn.clone()))
            .collect();
        (associations.quantity, items)
    }

    #[test]
    fn reads_default_triggers() {
        let config = distribution(vec![
            association("viewer-request", "arn:a:1"),
            association("origin-request", "arn:f:1"),
        ]);

        let triggers = config.default_triggers().unwrap();
        assert_eq!(triggers.len(), 2);
        assert_eq!(triggers[1].event_type, EventType::OriginRequest);
        assert_eq!(triggers[1].function_arn, "arn:f:1");
        assert!(!triggers[1].include_body);
    }

    #[test]
    fn merge_keeps_quantity_in_step_and_preserves_the_rest() {
        let mut config = distribution(vec![
            association("viewer-request", "arn:a:1"),
            association("origin-request", "arn:f:1"),
        ]);
        let merged = replace_trigger(
            config.default_triggers().unwrap(),
            TriggerAssociation {
                event_type: EventType::OriginRequest,
                function_arn: "arn:f:2".to_string(),
                include_body: false,
            },
        );

        config.set_default_triggers(merged).unwrap();

        let (quantity, items) = pairs(&config);
        assert_eq!(quantity, 2);
        assert_eq!(
            items,
            vec![
                ("viewer-request".to_string(), "arn:a:1".to_string()),
                ("origin-request".to_string(), "arn:f:2".to_string()),
            ]
        );
        assert_eq!(
            config.default_cache_behavior.as_ref().unwrap().target_origin_id,
            "s3"
        );
        assert_eq!(config.comment, "keep");
        assert_eq!(config.caller_reference, "ref-1");
    }

    #[test]
    fn behavior_without_associations_reads_as_empty() {
        let behavior = DefaultCacheBehavior::builder()
            .target_origin_id("s3")
            .viewer_protocol_policy(ViewerProtocolPolicy::AllowAll)
            .build()
            .unwrap();
        let mut config = DistributionConfig::builder()
            .caller_reference("ref-2")
            .comment("")
            .enabled(true)
            .default_cache_behavior(behavior)
            .build()
            .unwrap();

        assert!(config.default_triggers().unwrap().is_empty());
        config.set_default_triggers(Vec::new()).unwrap();
        assert_eq!(pairs(&config), (0, Vec::new()));
    }

    #[test]
    fn missing_default_behavior_is_reported() {
        let mut config = DistributionConfig::builder()
            .caller_reference("ref-3")
            .comment("")
            .enabled(true)
            .build()
            .unwrap();

        let err = config.default_triggers().unwrap_err();
        assert!(matches!(err, EdgeError::MissingSection(ref s) if s == "DefaultCacheBehavior"));
        let err = config.set_default_triggers(Vec::new()).unwrap_err();
        assert!(matches!(err, EdgeError::MissingSection(_)));
    }
}
