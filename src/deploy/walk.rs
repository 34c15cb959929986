// ABOUTME: Recursive directory walk shared by the packager, publisher, and bundle staging.
// ABOUTME: Yields regular files in sorted order with '/'-separated relative paths.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

/// A regular file found under the walk root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    /// Path relative to the root, always `/`-separated.
    pub relative: String,
}

#[derive(Debug, thiserror::Error)]
#[error("cannot read {path}: {source}")]
pub struct WalkError {
    pub path: PathBuf,
    pub source: io::Error,
}

/// Collect every regular file under `root`. Any file or directory listed in
/// `exclude` is skipped along with everything beneath it. Symlinks and
/// special files are skipped.
pub fn collect_files(root: &Path, exclude: &[&Path]) -> Result<Vec<WalkEntry>, WalkError> {
    let root = root.canonicalize().map_err(|source| WalkError {
        path: root.to_path_buf(),
        source,
    })?;
    let exclude: Vec<PathBuf> = exclude.iter().filter_map(|p| resolve(p)).collect();

    let mut entries = Vec::new();
    visit(&root, &root, &exclude, &mut entries)?;
    entries.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(entries)
}

fn visit(
    root: &Path,
    dir: &Path,
    exclude: &[PathBuf],
    entries: &mut Vec<WalkEntry>,
) -> Result<(), WalkError> {
    let read_err = |source: io::Error| WalkError {
        path: dir.to_path_buf(),
        source,
    };

    for child in fs::read_dir(dir).map_err(read_err)? {
        let child = child.map_err(read_err)?;
        let path = child.path();
        let file_type = child.file_type().map_err(|source| WalkError {
            path: path.clone(),
            source,
        })?;

        if exclude.contains(&path) {
            debug!(path = %path.display(), "Skipping excluded path inside source tree");
            continue;
        }

        if file_type.is_dir() {
            visit(root, &path, exclude, entries)?;
        } else if file_type.is_file() {
            let relative = relative_key(root, &path);
            entries.push(WalkEntry { path, relative });
        } else {
            debug!(path = %path.display(), "Skipping symlink or special file");
        }
    }
    Ok(())
}

fn relative_key(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Absolute form of `path`, even when the file itself does not exist yet.
fn resolve(path: &Path) -> Option<PathBuf> {
    if let Ok(resolved) = path.canonicalize() {
        return Some(resolved);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    parent.canonicalize().ok().map(|p| p.join(name))
}
