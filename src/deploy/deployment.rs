// ABOUTME: Generic deployment struct parameterized by state.
// ABOUTME: State types carry their own data for compile-time guarantees.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use super::invalidate::InvalidationOutcome;
use super::publish::UploadReport;
use super::state::{
    AssetsPublished, Completed, FunctionPublished, Initialized, Packaged, TriggerBound,
};
use super::trigger::TriggerBinding;
use crate::cloud::FunctionVersion;
use crate::config::Config;
use crate::diagnostics::Diagnostics;

/// A deployment in progress, parameterized by its current state.
///
/// The state type parameter `S` carries the artifacts of completed stages
/// (archive, upload report, function version, trigger binding), so a stage
/// can only run once its inputs exist.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) config: Config,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) state: S,
}

impl Deployment<Initialized> {
    pub fn new(config: Config) -> Self {
        Deployment {
            config,
            diagnostics: Diagnostics::default(),
            started_at: Utc::now(),
            state: Initialized,
        }
    }
}

impl<S> Deployment<S> {
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Warnings collected so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl Deployment<Packaged> {
    pub fn archive_path(&self) -> PathBuf {
        self.state.workspace.archive_path()
    }
}

impl Deployment<AssetsPublished> {
    pub fn uploads(&self) -> &UploadReport {
        &self.state.uploads
    }
}

impl Deployment<FunctionPublished> {
    pub fn version(&self) -> &FunctionVersion {
        &self.state.version
    }
}

impl Deployment<TriggerBound> {
    pub fn version(&self) -> &FunctionVersion {
        &self.state.version
    }

    pub fn binding(&self) -> &TriggerBinding {
        &self.state.binding
    }
}

impl Deployment<Completed> {
    pub fn version(&self) -> &FunctionVersion {
        &self.state.version
    }

    pub fn invalidation(&self) -> &InvalidationOutcome {
        &self.state.invalidation
    }
}
