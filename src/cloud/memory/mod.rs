// ABOUTME: In-process cloud backends with the same semantics as the real platforms.
// ABOUTME: Support failure injection and simulated concurrent writers for tests.

mod edge;
mod function;
mod object_store;

pub use edge::{CacheBehavior, DistributionConfig, InvalidationRecord, MemoryEdge};
pub use function::MemoryFunctions;
pub use object_store::{MemoryObjectStore, StoredObject};

use super::Cloud;

/// A fully in-memory cloud.
pub type MemoryCloud = Cloud<MemoryObjectStore, MemoryFunctions, MemoryEdge>;

impl MemoryCloud {
    /// Create an empty in-memory cloud.
    pub fn in_memory() -> Self {
        Cloud::new(
            MemoryObjectStore::new(),
            MemoryFunctions::new(),
            MemoryEdge::new(),
        )
    }
}
