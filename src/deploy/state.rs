// ABOUTME: Deployment state types for the type state pattern.
// ABOUTME: Each state carries the artifacts produced by the stages before it.

use super::invalidate::InvalidationOutcome;
use super::package::PackageSummary;
use super::publish::UploadReport;
use super::trigger::TriggerBinding;
use super::workspace::Workspace;
use crate::cloud::FunctionVersion;

/// Initial state: configuration resolved, nothing touched yet.
/// Available actions: `package()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Server bundle staged and zipped inside the run's workspace.
/// Available actions: `publish_assets()`
#[derive(Debug)]
pub struct Packaged {
    pub(crate) workspace: Workspace,
    pub(crate) package: PackageSummary,
}

/// Static assets uploaded to object storage.
/// Available actions: `publish_function()`
#[derive(Debug)]
pub struct AssetsPublished {
    pub(crate) workspace: Workspace,
    pub(crate) package: PackageSummary,
    pub(crate) uploads: UploadReport,
}

/// New function version published. The workspace is gone by now.
/// Available actions: `bind_trigger()`
#[derive(Debug)]
pub struct FunctionPublished {
    pub(crate) package: PackageSummary,
    pub(crate) uploads: UploadReport,
    pub(crate) version: FunctionVersion,
}

/// Edge trigger points at the new version.
/// Available actions: `invalidate()`
#[derive(Debug)]
pub struct TriggerBound {
    pub(crate) package: PackageSummary,
    pub(crate) uploads: UploadReport,
    pub(crate) version: FunctionVersion,
    pub(crate) binding: TriggerBinding,
}

/// Completed: every stage ran; invalidation may have been skipped or failed.
/// Available actions: `finish()`
#[derive(Debug)]
pub struct Completed {
    pub(crate) package: PackageSummary,
    pub(crate) uploads: UploadReport,
    pub(crate) version: FunctionVersion,
    pub(crate) binding: TriggerBinding,
    pub(crate) invalidation: InvalidationOutcome,
}
