// ABOUTME: In-memory object store keyed by bucket and object key.
// ABOUTME: Records content types and supports per-key failure injection.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::cloud::traits::sealed::Sealed;
use crate::cloud::traits::{ObjectStoreError, ObjectStoreOps};
use crate::types::BucketName;

/// An object held by the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
}

#[derive(Debug, Default)]
struct State {
    objects: BTreeMap<(String, String), StoredObject>,
    failing_keys: HashSet<String>,
    puts: usize,
}

/// Object store that keeps everything in a map.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    state: Mutex<State>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every upload of `key` fail.
    pub fn fail_key(&self, key: impl Into<String>) {
        self.state.lock().failing_keys.insert(key.into());
    }

    /// Keys stored in `bucket`, sorted.
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.state
            .lock()
            .objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.state
            .lock()
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Number of successful PUT calls.
    pub fn put_count(&self) -> usize {
        self.state.lock().puts
    }
}

impl Sealed for MemoryObjectStore {}

#[async_trait]
impl ObjectStoreOps for MemoryObjectStore {
    async fn put_object(
        &self,
        bucket: &BucketName,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), ObjectStoreError> {
        let mut state = self.state.lock();
        if state.failing_keys.contains(key) {
            return Err(ObjectStoreError::AccessDenied(key.to_string()));
        }

        state.objects.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        state.puts += 1;
        Ok(())
    }
}
