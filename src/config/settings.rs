// ABOUTME: Tunable settings for each pipeline stage.
// ABOUTME: Upload concurrency, function settle polling, trigger retry, invalidation paths.

use std::time::Duration;

use nonempty::NonEmpty;
use serde::Deserialize;

use super::deserialize::deserialize_paths;
use crate::cloud::EventType;
use crate::types::PathPattern;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PublishSettings {
    /// Maximum number of uploads in flight.
    pub concurrency: usize,
    /// Abort on the first failed upload instead of collecting failures.
    pub strict: bool,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            concurrency: 8,
            strict: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FunctionUpdateSettings {
    /// How long to wait for the new code to finish processing.
    #[serde(with = "humantime_serde")]
    pub settle_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
}

impl Default for FunctionUpdateSettings {
    fn default() -> Self {
        Self {
            settle_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TriggerSettings {
    /// Edge event the function version is bound to.
    pub event_type: EventType,
    pub include_body: bool,
    /// Total read-modify-write attempts, including the first.
    pub max_attempts: usize,
    #[serde(with = "humantime_serde")]
    pub min_delay: Duration,
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            event_type: EventType::OriginRequest,
            include_body: false,
            max_attempts: 5,
            min_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InvalidationSettings {
    pub enabled: bool,
    #[serde(deserialize_with = "deserialize_paths")]
    pub paths: NonEmpty<PathPattern>,
}

impl Default for InvalidationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            paths: NonEmpty::new(PathPattern::everything()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_trigger_section_keeps_other_defaults() {
        let settings: TriggerSettings = serde_yaml::from_str("max_attempts: 2").unwrap();
        assert_eq!(settings.max_attempts, 2);
        assert_eq!(settings.event_type, EventType::OriginRequest);
        assert_eq!(settings.min_delay, Duration::from_millis(200));
    }

    #[test]
    fn durations_use_humantime() {
        let settings: FunctionUpdateSettings =
            serde_yaml::from_str("settle_timeout: 2m\npoll_interval: 250ms").unwrap();
        assert_eq!(settings.settle_timeout, Duration::from_secs(120));
        assert_eq!(settings.poll_interval, Duration::from_millis(250));
    }

    #[test]
    fn empty_invalidation_paths_rejected() {
        let result: Result<InvalidationSettings, _> = serde_yaml::from_str("paths: []");
        assert!(result.is_err());
    }
}
