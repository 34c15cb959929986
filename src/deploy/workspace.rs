// ABOUTME: Per-run scratch directory under the configured output directory.
// ABOUTME: Holds the staged server bundle and archive; removed when dropped.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use super::error::DeployError;
use super::walk::collect_files;

const BUNDLE_DIR: &str = "bundle";
const PRERENDERED_DIR: &str = "prerendered";
const ARCHIVE_NAME: &str = "function.zip";

/// Scratch space owned by a single pipeline invocation.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    output_dir: PathBuf,
}

impl Workspace {
    /// Create a fresh, uniquely named directory inside `output_dir`.
    pub fn create(output_dir: &Path) -> Result<Self, DeployError> {
        let write_err = |source: std::io::Error| DeployError::Write {
            path: output_dir.to_path_buf(),
            source,
        };

        fs::create_dir_all(output_dir).map_err(write_err)?;
        let dir = tempfile::Builder::new()
            .prefix("edgeship-")
            .tempdir_in(output_dir)
            .map_err(write_err)?;

        debug!(workspace = %dir.path().display(), "Created workspace");
        Ok(Self {
            dir,
            output_dir: output_dir.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn bundle_dir(&self) -> PathBuf {
        self.path().join(BUNDLE_DIR)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.path().join(ARCHIVE_NAME)
    }

    /// Copy the server output, and the prerendered pages beneath it, into
    /// the bundle directory. Returns the bundle directory.
    ///
    /// The output directory, this workspace, and every path in `exclude`
    /// are left out when they sit inside the copied trees, so earlier
    /// archives and other runs' workspaces never reach the bundle.
    pub async fn stage_bundle(
        &self,
        server_dir: &Path,
        prerendered_dir: Option<&Path>,
        exclude: &[&Path],
    ) -> Result<PathBuf, DeployError> {
        let bundle = self.bundle_dir();
        let server = server_dir.to_path_buf();
        let prerendered = prerendered_dir.map(Path::to_path_buf);
        let target = bundle.clone();
        let skip: Vec<PathBuf> = [self.output_dir.as_path(), self.path()]
            .into_iter()
            .chain(exclude.iter().copied())
            .map(Path::to_path_buf)
            .collect();

        tokio::task::spawn_blocking(move || {
            let skip: Vec<&Path> = skip.iter().map(PathBuf::as_path).collect();
            let mut files = copy_tree(&server, &target, &skip)?;
            if let Some(prerendered) = prerendered {
                files += copy_tree(&prerendered, &target.join(PRERENDERED_DIR), &skip)?;
            }
            debug!(files, bundle = %target.display(), "Staged server bundle");
            Ok::<_, DeployError>(())
        })
        .await
        .map_err(|e| DeployError::Write {
            path: bundle.clone(),
            source: std::io::Error::other(e),
        })??;

        Ok(bundle)
    }
}

/// Copy every regular file under `from` into `to`, keeping relative paths.
fn copy_tree(from: &Path, to: &Path, exclude: &[&Path]) -> Result<usize, DeployError> {
    let entries = collect_files(from, exclude).map_err(|e| DeployError::Io {
        path: e.path,
        source: e.source,
    })?;

    fs::create_dir_all(to).map_err(|source| DeployError::Write {
        path: to.to_path_buf(),
        source,
    })?;

    for entry in &entries {
        let dest = to.join(&entry.relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|source| DeployError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::copy(&entry.path, &dest).map_err(|source| DeployError::Write {
            path: dest.clone(),
            source,
        })?;
    }
    Ok(entries.len())
}
