// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Packager, asset publisher, function deployer, trigger binder, and cache invalidator.

mod content_type;
mod deployment;
mod error;
mod function;
mod invalidate;
mod package;
mod pipeline;
mod publish;
mod state;
mod transitions;
mod trigger;
mod walk;
mod workspace;

pub use content_type::{DEFAULT_CONTENT_TYPE, content_type_for};
pub use deployment::Deployment;
pub use error::{DeployError, DeployErrorKind};
pub use function::deploy_function;
pub use invalidate::{InvalidationOutcome, caller_reference, invalidate};
pub use package::{PackageError, PackageSummary, package, package_dir};
pub use pipeline::{DeployFailure, DeployReport, Stage, run_pipeline};
pub use publish::{UploadFailure, UploadReport, UploadedObject, object_key, publish_assets};
pub use state::{AssetsPublished, Completed, FunctionPublished, Initialized, Packaged, TriggerBound};
pub use trigger::{TriggerBinding, bind_trigger, current_triggers, replace_trigger};
pub use workspace::Workspace;
