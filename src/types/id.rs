// ABOUTME: Edge platform identifiers tagged with what they identify.
// ABOUTME: A distribution ID cannot be passed where an invalidation ID is expected.

use serde::{Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

pub enum DistributionMarker {}
pub enum InvalidationMarker {}

/// An opaque identifier issued by the edge platform, tagged by kind.
#[must_use = "IDs reference resources and should not be ignored"]
pub struct Id<T> {
    value: String,
    _kind: PhantomData<T>,
}

pub type DistributionId = Id<DistributionMarker>;
pub type InvalidationId = Id<InvalidationMarker>;

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _kind: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

// Derives would demand the bounds of T, and the markers are uninhabited.

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Id").field(&self.value).finish()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}
