// ABOUTME: In-memory function platform with numbered immutable versions.
// ABOUTME: Simulates asynchronous code processing and update conflicts.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::cloud::traits::sealed::Sealed;
use crate::cloud::traits::{FunctionError, FunctionOps, FunctionVersion, Readiness};
use crate::types::FunctionName;

#[derive(Debug, Default)]
struct FunctionRecord {
    code: Bytes,
    versions: Vec<Bytes>,
    pending_polls: u32,
    pending_failure: Option<String>,
    failure: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    functions: HashMap<String, FunctionRecord>,
    settle_polls: u32,
    update_in_progress: bool,
    updates: usize,
}

/// Function platform that keeps code and versions in memory.
#[derive(Debug, Default)]
pub struct MemoryFunctions {
    state: Mutex<State>,
}

impl MemoryFunctions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function with `published` existing versions.
    pub fn add_function(&self, name: &str, published: usize) {
        let record = FunctionRecord {
            versions: vec![Bytes::new(); published],
            ..Default::default()
        };
        self.state.lock().functions.insert(name.to_string(), record);
    }

    /// Number of readiness polls that report `Pending` after each update.
    pub fn set_settle_polls(&self, polls: u32) {
        self.state.lock().settle_polls = polls;
    }

    /// Reject the next code updates as if another deployment were running.
    pub fn set_update_in_progress(&self, busy: bool) {
        self.state.lock().update_in_progress = busy;
    }

    /// Make the next update of `name` end in a failed processing state.
    pub fn fail_next_update(&self, name: &str, reason: impl Into<String>) {
        if let Some(record) = self.state.lock().functions.get_mut(name) {
            record.pending_failure = Some(reason.into());
        }
    }

    /// Version qualifiers published so far for `name`.
    pub fn published_versions(&self, name: &str) -> Vec<String> {
        self.state
            .lock()
            .functions
            .get(name)
            .map(|r| (1..=r.versions.len()).map(|v| v.to_string()).collect())
            .unwrap_or_default()
    }

    /// Code of a published version, if it exists.
    pub fn version_code(&self, name: &str, version: &str) -> Option<Bytes> {
        let index: usize = version.parse().ok()?;
        let state = self.state.lock();
        let record = state.functions.get(name)?;
        index
            .checked_sub(1)
            .and_then(|i| record.versions.get(i))
            .cloned()
    }

    /// Number of accepted code updates.
    pub fn update_count(&self) -> usize {
        self.state.lock().updates
    }

    fn arn(name: &str) -> String {
        format!("arn:memory:function:{}", name)
    }
}

impl Sealed for MemoryFunctions {}

#[async_trait]
impl FunctionOps for MemoryFunctions {
    async fn update_function_code(
        &self,
        name: &FunctionName,
        archive: Bytes,
    ) -> Result<(), FunctionError> {
        let mut state = self.state.lock();
        if state.update_in_progress {
            return Err(FunctionError::UpdateInProgress(name.to_string()));
        }
        if archive.is_empty() {
            return Err(FunctionError::InvalidArchive("archive is empty".to_string()));
        }

        let settle_polls = state.settle_polls;
        let record = state
            .functions
            .get_mut(name.as_str())
            .ok_or_else(|| FunctionError::NotFound(name.to_string()))?;
        record.code = archive;
        record.pending_polls = settle_polls;
        record.failure = record.pending_failure.take();
        state.updates += 1;
        Ok(())
    }

    async fn function_readiness(&self, name: &FunctionName) -> Result<Readiness, FunctionError> {
        let mut state = self.state.lock();
        let record = state
            .functions
            .get_mut(name.as_str())
            .ok_or_else(|| FunctionError::NotFound(name.to_string()))?;

        if record.pending_polls > 0 {
            record.pending_polls -= 1;
            return Ok(Readiness::Pending);
        }
        if let Some(reason) = &record.failure {
            return Ok(Readiness::Failed(reason.clone()));
        }
        Ok(Readiness::Ready)
    }

    async fn publish_version(&self, name: &FunctionName) -> Result<FunctionVersion, FunctionError> {
        let mut state = self.state.lock();
        let record = state
            .functions
            .get_mut(name.as_str())
            .ok_or_else(|| FunctionError::NotFound(name.to_string()))?;

        if record.pending_polls > 0 {
            return Err(FunctionError::Platform(
                "code update still in progress".to_string(),
            ));
        }

        record.versions.push(record.code.clone());
        Ok(FunctionVersion {
            function_arn: Self::arn(name.as_str()),
            version: record.versions.len().to_string(),
        })
    }
}
