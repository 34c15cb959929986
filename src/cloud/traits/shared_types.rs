// ABOUTME: Shared types used across cloud capability traits.
// ABOUTME: Trigger associations, event types, concurrency tokens, function versions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Edge lifecycle event a function can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    ViewerRequest,
    ViewerResponse,
    OriginRequest,
    OriginResponse,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ViewerRequest => "viewer-request",
            EventType::ViewerResponse => "viewer-response",
            EventType::OriginRequest => "origin-request",
            EventType::OriginResponse => "origin-response",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewer-request" => Ok(EventType::ViewerRequest),
            "viewer-response" => Ok(EventType::ViewerResponse),
            "origin-request" => Ok(EventType::OriginRequest),
            "origin-response" => Ok(EventType::OriginResponse),
            other => Err(format!("unknown event type: {}", other)),
        }
    }
}

/// Binding from an edge event to an immutable function version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerAssociation {
    pub event_type: EventType,
    /// Version-qualified function ARN.
    pub function_arn: String,
    pub include_body: bool,
}

/// Opaque token returned on read and required on write.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConcurrencyToken(String);

impl ConcurrencyToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConcurrencyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A configuration snapshot and the token it was read at.
#[derive(Debug, Clone)]
pub struct VersionedConfig<C> {
    pub config: C,
    pub token: ConcurrencyToken,
}

/// An immutable published function version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionVersion {
    /// Unqualified function ARN.
    pub function_arn: String,
    pub version: String,
}

impl FunctionVersion {
    /// ARN pinned to this version, as edge triggers require.
    pub fn qualified_arn(&self) -> String {
        format!("{}:{}", self.function_arn, self.version)
    }
}

/// Processing state of the most recent code update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    Pending,
    Failed(String),
}
