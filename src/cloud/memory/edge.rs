// ABOUTME: In-memory edge platform with ETag-style concurrency tokens.
// ABOUTME: Can inject writes from a simulated concurrent deployer between read and write.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use nonempty::NonEmpty;
use parking_lot::Mutex;

use crate::cloud::traits::sealed::Sealed;
use crate::cloud::traits::{
    ConcurrencyToken, EdgeError, EdgeOps, TriggerAssociation, TriggerConfig, VersionedConfig,
};
use crate::types::{DistributionId, InvalidationId, PathPattern};

/// Distribution configuration as modelled by the in-memory edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionConfig {
    pub comment: String,
    pub enabled: bool,
    pub origins: Vec<String>,
    pub default_behavior: Option<CacheBehavior>,
    pub behaviors: Vec<CacheBehavior>,
}

/// A cache behavior and the triggers attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheBehavior {
    pub path_pattern: String,
    pub target_origin: String,
    pub triggers: Vec<TriggerAssociation>,
}

impl DistributionConfig {
    /// A distribution with one origin and a default behavior without triggers.
    pub fn new(origin: &str) -> Self {
        Self {
            comment: String::new(),
            enabled: true,
            origins: vec![origin.to_string()],
            default_behavior: Some(CacheBehavior {
                path_pattern: "*".to_string(),
                target_origin: origin.to_string(),
                triggers: Vec::new(),
            }),
            behaviors: Vec::new(),
        }
    }

    /// Attach a trigger to the default behavior.
    pub fn with_trigger(mut self, trigger: TriggerAssociation) -> Self {
        if let Some(behavior) = self.default_behavior.as_mut() {
            behavior.triggers.push(trigger);
        }
        self
    }

    /// Drop the default behavior, producing an incompatible distribution.
    pub fn without_default_behavior(mut self) -> Self {
        self.default_behavior = None;
        self
    }
}

impl TriggerConfig for DistributionConfig {
    fn default_triggers(&self) -> Result<Vec<TriggerAssociation>, EdgeError> {
        self.default_behavior
            .as_ref()
            .map(|b| b.triggers.clone())
            .ok_or_else(|| EdgeError::MissingSection("default cache behavior".to_string()))
    }

    fn set_default_triggers(
        &mut self,
        triggers: Vec<TriggerAssociation>,
    ) -> Result<(), EdgeError> {
        let behavior = self
            .default_behavior
            .as_mut()
            .ok_or_else(|| EdgeError::MissingSection("default cache behavior".to_string()))?;
        behavior.triggers = triggers;
        Ok(())
    }
}

/// An invalidation request accepted by the in-memory edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationRecord {
    pub id: String,
    pub paths: Vec<String>,
    pub caller_reference: String,
}

type ConcurrentWrite = Box<dyn FnOnce(&mut DistributionConfig) + Send>;

struct DistributionRecord {
    config: DistributionConfig,
    revision: u64,
    update_calls: usize,
    concurrent_writes: VecDeque<ConcurrentWrite>,
    invalidations: Vec<InvalidationRecord>,
}

impl DistributionRecord {
    fn token(&self) -> ConcurrencyToken {
        ConcurrencyToken::new(format!("E{}", self.revision))
    }
}

#[derive(Default)]
struct State {
    distributions: HashMap<String, DistributionRecord>,
    fail_invalidations: bool,
    invalidation_seq: u64,
}

/// Edge platform that keeps distributions in memory.
#[derive(Default)]
pub struct MemoryEdge {
    state: Mutex<State>,
}

impl std::fmt::Debug for MemoryEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MemoryEdge")
            .field("distributions", &state.distributions.len())
            .finish()
    }
}

impl MemoryEdge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a distribution.
    pub fn insert_distribution(&self, id: &str, config: DistributionConfig) {
        self.state.lock().distributions.insert(
            id.to_string(),
            DistributionRecord {
                config,
                revision: 1,
                update_calls: 0,
                concurrent_writes: VecDeque::new(),
                invalidations: Vec::new(),
            },
        );
    }

    /// Current configuration of a distribution.
    pub fn distribution(&self, id: &str) -> Option<DistributionConfig> {
        self.state
            .lock()
            .distributions
            .get(id)
            .map(|r| r.config.clone())
    }

    /// Current concurrency token of a distribution.
    pub fn token(&self, id: &str) -> Option<ConcurrencyToken> {
        self.state.lock().distributions.get(id).map(|r| r.token())
    }

    /// Number of update calls received, including rejected ones.
    pub fn update_calls(&self, id: &str) -> usize {
        self.state
            .lock()
            .distributions
            .get(id)
            .map(|r| r.update_calls)
            .unwrap_or(0)
    }

    /// Invalidations accepted for a distribution, oldest first.
    pub fn invalidations(&self, id: &str) -> Vec<InvalidationRecord> {
        self.state
            .lock()
            .distributions
            .get(id)
            .map(|r| r.invalidations.clone())
            .unwrap_or_default()
    }

    /// Queue a write by another deployer. It lands right after the next read
    /// of the distribution, so the reader's token goes stale.
    pub fn schedule_concurrent_write<F>(&self, id: &str, write: F)
    where
        F: FnOnce(&mut DistributionConfig) + Send + 'static,
    {
        if let Some(record) = self.state.lock().distributions.get_mut(id) {
            record.concurrent_writes.push_back(Box::new(write));
        }
    }

    /// Make every invalidation request fail.
    pub fn set_fail_invalidations(&self, fail: bool) {
        self.state.lock().fail_invalidations = fail;
    }
}

impl Sealed for MemoryEdge {}

#[async_trait]
impl EdgeOps for MemoryEdge {
    type Config = DistributionConfig;

    async fn get_distribution_config(
        &self,
        id: &DistributionId,
    ) -> Result<VersionedConfig<DistributionConfig>, EdgeError> {
        let mut state = self.state.lock();
        let record = state
            .distributions
            .get_mut(id.as_str())
            .ok_or_else(|| EdgeError::NotFound(id.to_string()))?;

        let snapshot = VersionedConfig {
            config: record.config.clone(),
            token: record.token(),
        };

        if let Some(write) = record.concurrent_writes.pop_front() {
            write(&mut record.config);
            record.revision += 1;
        }

        Ok(snapshot)
    }

    async fn update_distribution_config(
        &self,
        id: &DistributionId,
        config: DistributionConfig,
        token: &ConcurrencyToken,
    ) -> Result<ConcurrencyToken, EdgeError> {
        let mut state = self.state.lock();
        let record = state
            .distributions
            .get_mut(id.as_str())
            .ok_or_else(|| EdgeError::NotFound(id.to_string()))?;

        record.update_calls += 1;
        if record.token() != *token {
            return Err(EdgeError::Conflict(id.to_string()));
        }

        record.config = config;
        record.revision += 1;
        Ok(record.token())
    }

    async fn create_invalidation(
        &self,
        id: &DistributionId,
        paths: &NonEmpty<PathPattern>,
        caller_reference: &str,
    ) -> Result<InvalidationId, EdgeError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if state.fail_invalidations {
            return Err(EdgeError::Platform("invalidation rejected".to_string()));
        }

        let record = state
            .distributions
            .get_mut(id.as_str())
            .ok_or_else(|| EdgeError::NotFound(id.to_string()))?;
        state.invalidation_seq += 1;
        let invalidation_id = format!("I{}", state.invalidation_seq);

        record.invalidations.push(InvalidationRecord {
            id: invalidation_id.clone(),
            paths: paths.iter().map(|p| p.to_string()).collect(),
            caller_reference: caller_reference.to_string(),
        });
        Ok(InvalidationId::new(invalidation_id))
    }
}
