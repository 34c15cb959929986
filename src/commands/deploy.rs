// ABOUTME: Deploy command implementation.
// ABOUTME: Runs hooks around the full pipeline against the AWS backends.

use std::path::Path;

use edgeship::cloud::aws::AwsCloud;
use edgeship::config::Config;
use edgeship::deploy::run_pipeline;
use edgeship::diagnostics::{Diagnostics, Warning};
use edgeship::error::{Error, Result};
use edgeship::hooks::{HookContext, HookPoint, HookRunner};
use edgeship::output::Output;

pub async fn deploy(config: Config, project_dir: &Path, output: &mut Output) -> Result<()> {
    output.start_timer();
    let hooks = HookRunner::new(project_dir);
    let context = HookContext::new(&config.deployment);
    let mut diag = Diagnostics::default();

    output.progress(&format!(
        "Deploying to s3://{}, function {}, distribution {}",
        config.deployment.object_store.bucket,
        config.deployment.function.name,
        config.deployment.edge.distribution_id
    ));

    run_hook(&hooks, HookPoint::PreDeploy, &context, &mut diag).await?;

    let cloud = AwsCloud::connect(&config.deployment).await;
    let result = run_pipeline(config, &cloud, |stage| output.progress(stage.description())).await;

    let report = match result {
        Ok(report) => report,
        Err(failure) => {
            let hook = hooks.run(HookPoint::OnError, &context).await;
            if let Some(result) = hook.filter(|r| !r.success) {
                diag.warn(Warning::hook(result.failure_summary(HookPoint::OnError)));
            }
            for warning in failure.warnings.iter().chain(diag.warnings()) {
                output.warning(&warning.message);
            }
            return Err(failure.error.into());
        }
    };

    let context = context.with_version(report.function_version.version.clone());
    run_hook(&hooks, HookPoint::PostDeploy, &context, &mut diag).await?;

    for warning in report.warnings.iter().chain(diag.warnings()) {
        output.warning(&warning.message);
    }

    output.success_with(
        &format!(
            "Deployed {} version {} ({} assets)",
            report.function,
            report.function_version.version,
            report.uploads.uploaded.len()
        ),
        &report,
    );
    Ok(())
}

/// Run one hook. A failed fatal hook aborts; any other failure is recorded
/// as a warning.
async fn run_hook(
    hooks: &HookRunner,
    point: HookPoint,
    context: &HookContext,
    diag: &mut Diagnostics,
) -> Result<()> {
    let Some(result) = hooks.run(point, context).await else {
        return Ok(());
    };
    if result.success {
        return Ok(());
    }

    let summary = result.failure_summary(point);
    if point.is_fatal() {
        return Err(Error::Hook(summary));
    }
    diag.warn(Warning::hook(summary));
    Ok(())
}
