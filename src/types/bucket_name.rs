// ABOUTME: Object-store bucket name validation.
// ABOUTME: Enforces S3-style naming: 3-63 chars, lowercase, digits, dots, hyphens.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BucketNameError {
    #[error("bucket name must be between 3 and 63 characters")]
    InvalidLength,

    #[error("bucket name must start and end with a letter or digit")]
    InvalidBoundary,

    #[error("bucket name cannot contain consecutive dots")]
    ConsecutiveDots,

    #[error("invalid character in bucket name: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BucketName(String);

impl BucketName {
    pub fn new(value: &str) -> Result<Self, BucketNameError> {
        if value.len() < 3 || value.len() > 63 {
            return Err(BucketNameError::InvalidLength);
        }

        for c in value.chars() {
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '.' && c != '-' {
                return Err(BucketNameError::InvalidChar(c));
            }
        }

        let alnum = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
        let starts_ok = value.chars().next().is_some_and(alnum);
        let ends_ok = value.chars().last().is_some_and(alnum);
        if !starts_ok || !ends_ok {
            return Err(BucketNameError::InvalidBoundary);
        }

        if value.contains("..") {
            return Err(BucketNameError::ConsecutiveDots);
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
