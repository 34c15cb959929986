// ABOUTME: Error types for deployment operations.
// ABOUTME: One variant per failure class, with a kind for programmatic handling.

use std::path::PathBuf;

use super::package::PackageError;

/// Errors that can occur while running the deployment pipeline.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// A local file or directory could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A local file could not be created or written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Replacing the function code was rejected.
    #[error("function code update failed: {0}")]
    FunctionUpdate(String),

    /// The updated code never settled, or the version could not be published.
    #[error("function version publish failed: {0}")]
    FunctionPublish(String),

    /// An asset upload failed in strict mode.
    #[error("asset upload failed for {key}: {reason}")]
    AssetUpload { key: String, reason: String },

    /// The distribution configuration lacks a section the binder requires.
    #[error("distribution configuration is missing required section: {0}")]
    MissingSection(String),

    /// Concurrent writers kept invalidating our token.
    #[error(
        "distribution {distribution} was modified concurrently; gave up after {attempts} attempt(s)"
    )]
    Conflict {
        distribution: String,
        attempts: usize,
    },

    /// Any other edge platform failure while binding the trigger.
    #[error("edge update failed: {0}")]
    Edge(String),

    /// The invalidation request was rejected.
    #[error("cache invalidation failed: {0}")]
    Invalidation(String),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Io,
    Write,
    FunctionUpdate,
    FunctionPublish,
    AssetUpload,
    Schema,
    Conflict,
    Edge,
    Invalidation,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Io { .. } => DeployErrorKind::Io,
            DeployError::Write { .. } => DeployErrorKind::Write,
            DeployError::FunctionUpdate(_) => DeployErrorKind::FunctionUpdate,
            DeployError::FunctionPublish(_) => DeployErrorKind::FunctionPublish,
            DeployError::AssetUpload { .. } => DeployErrorKind::AssetUpload,
            DeployError::MissingSection(_) => DeployErrorKind::Schema,
            DeployError::Conflict { .. } => DeployErrorKind::Conflict,
            DeployError::Edge(_) => DeployErrorKind::Edge,
            DeployError::Invalidation(_) => DeployErrorKind::Invalidation,
        }
    }

    /// Whether running the same operation again may succeed without any
    /// change to the inputs.
    pub fn is_retryable(&self) -> bool {
        self.kind() == DeployErrorKind::Conflict
    }
}

impl From<PackageError> for DeployError {
    fn from(err: PackageError) -> Self {
        match err {
            PackageError::ReadSource { path, source } => DeployError::Io { path, source },
            PackageError::CreateArchive { path, source } => DeployError::Write { path, source },
            PackageError::WriteArchive { path, source } => DeployError::Write {
                path,
                source: std::io::Error::other(source),
            },
            PackageError::Interrupted { path, source } => DeployError::Write {
                path,
                source: std::io::Error::other(source),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_conflicts_are_retryable() {
        let conflict = DeployError::Conflict {
            distribution: "E1".to_string(),
            attempts: 5,
        };
        assert!(conflict.is_retryable());
        assert!(!DeployError::MissingSection("DefaultCacheBehavior".to_string()).is_retryable());
        assert!(!DeployError::FunctionUpdate("busy".to_string()).is_retryable());
    }

    #[test]
    fn missing_section_is_schema_kind() {
        let err = DeployError::MissingSection("DefaultCacheBehavior".to_string());
        assert_eq!(err.kind(), DeployErrorKind::Schema);
    }

    #[test]
    fn package_read_failure_maps_to_io() {
        let err: DeployError = PackageError::ReadSource {
            path: PathBuf::from("build/server"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
        .into();
        assert_eq!(err.kind(), DeployErrorKind::Io);
        assert!(err.to_string().contains("build/server"));
    }
}
