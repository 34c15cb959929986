// ABOUTME: Capability traits for the three cloud tiers.
// ABOUTME: Defines ObjectStoreOps, FunctionOps, EdgeOps, and the TriggerConfig view.

mod edge;
mod function;
mod object_store;
pub(crate) mod sealed;
mod shared_types;

pub use edge::{EdgeError, EdgeOps, TriggerConfig};
pub use function::{FunctionError, FunctionOps};
pub use object_store::{ObjectStoreError, ObjectStoreOps};
pub use shared_types::*;
