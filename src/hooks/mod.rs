// ABOUTME: Hooks system for deployment lifecycle events.
// ABOUTME: Discovers and executes shell scripts at pre-deploy, post-deploy, and on-error points.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::config::DeploymentConfig;

/// Hook execution points in the deployment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPoint {
    /// Before deployment starts. Failure aborts deployment.
    PreDeploy,
    /// After successful deployment. Failure logs warning.
    PostDeploy,
    /// On deployment failure. Failure logs warning.
    OnError,
}

impl HookPoint {
    /// Get the hook filename for this point.
    pub fn filename(&self) -> &'static str {
        match self {
            HookPoint::PreDeploy => "pre-deploy",
            HookPoint::PostDeploy => "post-deploy",
            HookPoint::OnError => "on-error",
        }
    }

    /// Whether failure at this hook point should abort deployment.
    pub fn is_fatal(&self) -> bool {
        matches!(self, HookPoint::PreDeploy)
    }
}

/// Context passed to hooks via environment variables.
#[derive(Debug, Clone)]
pub struct HookContext {
    pub bucket: String,
    pub function: String,
    pub distribution: String,
    /// Published function version, once known.
    pub version: Option<String>,
}

impl HookContext {
    pub fn new(deployment: &DeploymentConfig) -> Self {
        Self {
            bucket: deployment.object_store.bucket.to_string(),
            function: deployment.function.name.to_string(),
            distribution: deployment.edge.distribution_id.to_string(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Convert context to environment variables.
    pub fn to_env(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert("EDGESHIP_BUCKET".to_string(), self.bucket.clone());
        env.insert("EDGESHIP_FUNCTION".to_string(), self.function.clone());
        env.insert("EDGESHIP_DISTRIBUTION".to_string(), self.distribution.clone());
        if let Some(ref version) = self.version {
            env.insert("EDGESHIP_VERSION".to_string(), version.clone());
        }
        env
    }
}

/// Outcome of a hook that was found and executed.
#[derive(Debug)]
pub struct HookResult {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl HookResult {
    /// One-line description of a failed run for warnings and errors.
    pub fn failure_summary(&self, point: HookPoint) -> String {
        let status = match self.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "no exit code".to_string(),
        };
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("{} hook failed ({})", point.filename(), status)
        } else {
            format!("{} hook failed ({}): {}", point.filename(), status, stderr)
        }
    }
}

/// Finds hook scripts under `<project>/.edgeship/hooks` and runs them.
pub struct HookRunner {
    hooks_dir: PathBuf,
}

impl HookRunner {
    pub fn new(project_dir: &Path) -> Self {
        Self {
            hooks_dir: project_dir.join(".edgeship").join("hooks"),
        }
    }

    pub fn hook_exists(&self, point: HookPoint) -> bool {
        self.hook_path(point).is_file()
    }

    fn hook_path(&self, point: HookPoint) -> PathBuf {
        self.hooks_dir.join(point.filename())
    }

    /// Run the hook for `point`, or return `None` when there is none.
    ///
    /// A script that cannot be spawned counts as a failed run.
    pub async fn run(&self, point: HookPoint, context: &HookContext) -> Option<HookResult> {
        let hook_path = self.hook_path(point);
        if !hook_path.is_file() {
            return None;
        }

        tracing::info!(hook = point.filename(), path = %hook_path.display(), "Running hook");

        let result = match Command::new(&hook_path)
            .envs(context.to_env())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
        {
            Ok(output) => HookResult {
                success: output.status.success(),
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            },
            Err(e) => HookResult {
                success: false,
                exit_code: None,
                stdout: String::new(),
                stderr: e.to_string(),
            },
        };

        if result.success {
            tracing::info!(hook = point.filename(), "Hook completed");
        } else {
            tracing::warn!(hook = point.filename(), exit_code = ?result.exit_code, "Hook failed");
        }
        Some(result)
    }
}
