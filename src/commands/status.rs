// ABOUTME: Status command implementation.
// ABOUTME: Prints resolved targets and the distribution's current default-behavior triggers.

use edgeship::cloud::TriggerAssociation;
use edgeship::cloud::aws::CloudFrontEdge;
use edgeship::config::Config;
use edgeship::deploy::current_triggers;
use edgeship::error::Result;
use edgeship::output::Output;
use serde::Serialize;

#[derive(Serialize)]
struct Status<'a> {
    bucket: &'a str,
    prefix: Option<&'a str>,
    function: &'a str,
    distribution: &'a str,
    triggers: &'a [TriggerAssociation],
}

pub async fn status(config: Config, output: &mut Output) -> Result<()> {
    let deployment = &config.deployment;
    let edge = CloudFrontEdge::connect(&deployment.edge.region).await;
    let triggers = current_triggers(&edge, &deployment.edge.distribution_id).await?;

    output.progress(&format!(
        "Assets:       s3://{}/{} ({})",
        deployment.object_store.bucket,
        deployment
            .object_store
            .prefix
            .as_ref()
            .map(|p| p.as_str())
            .unwrap_or(""),
        deployment.object_store.region
    ));
    output.progress(&format!(
        "Function:     {} ({})",
        deployment.function.name, deployment.function.region
    ));
    output.progress(&format!("Distribution: {}", deployment.edge.distribution_id));
    if triggers.is_empty() {
        output.progress("No triggers bound on the default behavior");
    }
    for trigger in &triggers {
        output.progress(&format!("  {} → {}", trigger.event_type, trigger.function_arn));
    }

    let status = Status {
        bucket: deployment.object_store.bucket.as_str(),
        prefix: deployment.object_store.prefix.as_ref().map(|p| p.as_str()),
        function: deployment.function.name.as_str(),
        distribution: deployment.edge.distribution_id.as_str(),
        triggers: &triggers,
    };
    output.success_with(&format!("{} trigger(s) bound", triggers.len()), &status);
    Ok(())
}
