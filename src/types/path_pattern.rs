// ABOUTME: Edge cache invalidation path pattern.
// ABOUTME: Patterns must be absolute and may end with a single '*' wildcard.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathPatternError {
    #[error("invalidation path cannot be empty")]
    Empty,

    #[error("invalidation path must start with '/': {0}")]
    NotAbsolute(String),

    #[error("wildcard is only allowed at the end of an invalidation path: {0}")]
    MisplacedWildcard(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PathPattern(String);

impl PathPattern {
    pub fn new(value: &str) -> Result<Self, PathPatternError> {
        if value.is_empty() {
            return Err(PathPatternError::Empty);
        }

        if !value.starts_with('/') {
            return Err(PathPatternError::NotAbsolute(value.to_string()));
        }

        if let Some(pos) = value.find('*')
            && pos != value.len() - 1
        {
            return Err(PathPatternError::MisplacedWildcard(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }

    /// The pattern that matches every cached object.
    pub fn everything() -> Self {
        Self("/*".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_wildcard_suffix() {
        assert!(PathPattern::new("/*").is_ok());
        assert!(PathPattern::new("/assets/*").is_ok());
        assert!(PathPattern::new("/index.html").is_ok());
    }

    #[test]
    fn rejects_relative_and_inner_wildcards() {
        assert_eq!(
            PathPattern::new("index.html"),
            Err(PathPatternError::NotAbsolute("index.html".to_string()))
        );
        assert_eq!(
            PathPattern::new("/a/*/b"),
            Err(PathPatternError::MisplacedWildcard("/a/*/b".to_string()))
        );
        assert_eq!(PathPattern::new(""), Err(PathPatternError::Empty));
    }
}
