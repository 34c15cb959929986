// ABOUTME: Package command implementation.
// ABOUTME: Stages and zips the server bundle locally without touching the cloud.

use std::path::PathBuf;

use edgeship::config::Config;
use edgeship::deploy::{DeployError, Workspace, package as package_bundle};
use edgeship::error::Result;
use edgeship::output::Output;

pub async fn package(config: Config, destination: Option<PathBuf>, output: &mut Output) -> Result<()> {
    output.start_timer();
    let build = &config.build;

    let destination = destination.unwrap_or_else(|| build.output_dir.join("function.zip"));

    let workspace = Workspace::create(&build.output_dir)?;
    output.progress("Staging server bundle");
    let bundle = workspace
        .stage_bundle(
            &build.server_dir,
            build.prerendered_dir.as_deref(),
            &[destination.as_path()],
        )
        .await?;

    output.progress(&format!("Writing {}", destination.display()));
    let summary = package_bundle(&bundle, &destination)
        .await
        .map_err(DeployError::from)?;

    output.success_with(
        &format!(
            "Packaged {} files into {} ({} bytes)",
            summary.files,
            summary.archive_path.display(),
            summary.bytes
        ),
        &summary,
    );
    Ok(())
}
