// ABOUTME: Cloud backends for the three deployment tiers.
// ABOUTME: Capability traits plus AWS and in-memory implementations.

pub mod aws;
pub mod memory;
pub mod traits;

pub use traits::*;

/// The three tiers a deployment touches, bundled for the pipeline.
#[derive(Debug)]
pub struct Cloud<S, F, E> {
    pub store: S,
    pub functions: F,
    pub edge: E,
}

impl<S, F, E> Cloud<S, F, E>
where
    S: ObjectStoreOps,
    F: FunctionOps,
    E: EdgeOps,
{
    pub fn new(store: S, functions: F, edge: E) -> Self {
        Self {
            store,
            functions,
            edge,
        }
    }
}
