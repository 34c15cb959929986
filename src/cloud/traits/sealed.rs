// ABOUTME: Sealed trait pattern for cloud capability traits.
// ABOUTME: Prevents external implementations, allowing non-breaking evolution.

/// Sealed trait to prevent external implementations.
///
/// Only the backends shipped in this crate (AWS and in-memory) can implement
/// the capability traits, so methods can be added without breaking semver.
pub trait Sealed {}
