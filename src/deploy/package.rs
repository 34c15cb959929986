// ABOUTME: Packager: compresses a server bundle directory into a zip archive.
// ABOUTME: Deterministic entry order, self-reference guard, SNAFU errors with path context.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use super::walk::collect_files;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PackageError {
    #[snafu(display("cannot read {}: {source}", path.display()))]
    ReadSource { path: PathBuf, source: std::io::Error },

    #[snafu(display("cannot create archive {}: {source}", path.display()))]
    CreateArchive { path: PathBuf, source: std::io::Error },

    #[snafu(display("cannot write archive {}: {source}", path.display()))]
    WriteArchive { path: PathBuf, source: ZipError },

    #[snafu(display("packaging {} was interrupted: {source}", path.display()))]
    Interrupted {
        path: PathBuf,
        source: tokio::task::JoinError,
    },
}

/// What ended up in the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSummary {
    pub archive_path: PathBuf,
    pub files: usize,
    /// Size of the finished archive.
    pub bytes: u64,
}

/// Zip every regular file under `source_dir` into `archive_path`.
///
/// Runs the filesystem work on the blocking pool.
pub async fn package(
    source_dir: &Path,
    archive_path: &Path,
) -> Result<PackageSummary, PackageError> {
    let source = source_dir.to_path_buf();
    let archive = archive_path.to_path_buf();
    tokio::task::spawn_blocking(move || package_dir(&source, &archive))
        .await
        .context(InterruptedSnafu { path: archive_path })?
}

/// Blocking form of [`package`].
///
/// Entries are written in sorted relative-path order with `/` separators
/// and a fixed timestamp, so identical trees give identical entry lists.
/// If `archive_path` lies inside `source_dir` it is left out of the walk.
pub fn package_dir(source_dir: &Path, archive_path: &Path) -> Result<PackageSummary, PackageError> {
    let entries =
        collect_files(source_dir, &[archive_path]).map_err(|e| PackageError::ReadSource {
            path: e.path,
            source: e.source,
        })?;

    let file = File::create(archive_path).context(CreateArchiveSnafu { path: archive_path })?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    for entry in &entries {
        let data = fs::read(&entry.path).context(ReadSourceSnafu { path: &entry.path })?;
        writer
            .start_file(entry.relative.as_str(), options)
            .context(WriteArchiveSnafu { path: archive_path })?;
        writer
            .write_all(&data)
            .map_err(ZipError::Io)
            .context(WriteArchiveSnafu { path: archive_path })?;
        debug!(entry = %entry.relative, size = data.len(), "Added archive entry");
    }

    let mut inner = writer
        .finish()
        .context(WriteArchiveSnafu { path: archive_path })?;
    inner
        .flush()
        .map_err(ZipError::Io)
        .context(WriteArchiveSnafu { path: archive_path })?;
    drop(inner);

    let bytes = fs::metadata(archive_path)
        .context(CreateArchiveSnafu { path: archive_path })?
        .len();

    info!(
        archive = %archive_path.display(),
        files = entries.len(),
        bytes,
        "Packaged server bundle"
    );

    Ok(PackageSummary {
        archive_path: archive_path.to_path_buf(),
        files: entries.len(),
        bytes,
    })
}
