// ABOUTME: Invalidate command implementation.
// ABOUTME: Submits one cache invalidation for the given or configured paths.

use edgeship::cloud::aws::CloudFrontEdge;
use edgeship::config::Config;
use edgeship::deploy::{caller_reference, invalidate as submit_invalidation};
use edgeship::error::{Error, Result};
use edgeship::output::Output;
use edgeship::types::PathPattern;
use nonempty::NonEmpty;
use serde::Serialize;

#[derive(Serialize)]
struct Submitted<'a> {
    distribution: &'a str,
    invalidation: &'a str,
    caller_reference: &'a str,
    paths: Vec<&'a str>,
}

pub async fn invalidate(config: Config, paths: Vec<String>, output: &mut Output) -> Result<()> {
    output.start_timer();
    let paths = parse_paths(paths)?.unwrap_or_else(|| config.invalidation.paths.clone());
    let distribution = &config.deployment.edge.distribution_id;

    let edge = CloudFrontEdge::connect(&config.deployment.edge.region).await;
    let reference = caller_reference();
    output.progress(&format!(
        "Invalidating {} path(s) on {}",
        paths.len(),
        distribution
    ));
    let id = submit_invalidation(&edge, distribution, &paths, &reference).await?;

    let payload = Submitted {
        distribution: distribution.as_str(),
        invalidation: id.as_str(),
        caller_reference: &reference,
        paths: paths.iter().map(PathPattern::as_str).collect(),
    };
    output.success_with(&format!("Submitted invalidation {}", id), &payload);
    Ok(())
}

/// `None` when no paths were given on the command line.
fn parse_paths(raw: Vec<String>) -> Result<Option<NonEmpty<PathPattern>>> {
    let parsed = raw
        .iter()
        .map(|p| PathPattern::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::InvalidConfig(e.to_string()))?;
    Ok(NonEmpty::from_vec(parsed))
}
