// ABOUTME: Normalized object key prefix.
// ABOUTME: Strips surrounding slashes; an empty prefix is represented by absence.

use serde::Serialize;
use std::fmt;

/// A non-empty key prefix without leading or trailing slashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct KeyPrefix(String);

impl KeyPrefix {
    /// Normalize a user-supplied prefix. Returns `None` when nothing but
    /// slashes or whitespace remains.
    pub fn new(value: &str) -> Option<Self> {
        let trimmed = value.trim().trim_matches('/');
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the object key for a relative path under this prefix.
    pub fn join(&self, relative: &str) -> String {
        format!("{}/{}", self.0, relative.trim_start_matches('/'))
    }
}

impl fmt::Display for KeyPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
