// ABOUTME: Raw configuration layers with presence-aware fields.
// ABOUTME: Built-in defaults, config file, and environment merged leaf by leaf.

use serde::Deserialize;

use super::deserialize::empty_string_as_none;
use super::settings::{
    FunctionUpdateSettings, InvalidationSettings, PublishSettings, TriggerSettings,
};

pub const ENV_BUCKET: &str = "EDGESHIP_BUCKET";
pub const ENV_PREFIX: &str = "EDGESHIP_PREFIX";
pub const ENV_FUNCTION: &str = "EDGESHIP_FUNCTION";
pub const ENV_DISTRIBUTION: &str = "EDGESHIP_DISTRIBUTION";

const DEFAULT_REGION: &str = "us-east-1";

/// One configuration layer. Every leaf is optional so that "not given" can
/// be told apart from any concrete value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub object_store: RawObjectStore,
    #[serde(default)]
    pub function: RawFunction,
    #[serde(default)]
    pub edge: RawEdge,
    #[serde(default)]
    pub build: RawBuild,
    #[serde(default)]
    pub publish: Option<PublishSettings>,
    #[serde(default)]
    pub function_update: Option<FunctionUpdateSettings>,
    #[serde(default)]
    pub trigger: Option<TriggerSettings>,
    #[serde(default)]
    pub invalidation: Option<InvalidationSettings>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawObjectStore {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub bucket: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub prefix: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFunction {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEdge {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub distribution_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBuild {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub static_dir: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub server_dir: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub prerendered_dir: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub output_dir: Option<String>,
}

impl RawConfig {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// The baked-in lowest layer.
    pub fn defaults() -> Self {
        Self {
            object_store: RawObjectStore {
                bucket: None,
                prefix: None,
                region: Some(DEFAULT_REGION.to_string()),
            },
            function: RawFunction {
                name: None,
                region: Some(DEFAULT_REGION.to_string()),
            },
            edge: RawEdge {
                distribution_id: None,
                region: Some(DEFAULT_REGION.to_string()),
            },
            build: RawBuild {
                static_dir: Some("build/static".to_string()),
                server_dir: Some("build/server".to_string()),
                prerendered_dir: None,
                output_dir: Some(".edgeship".to_string()),
            },
            publish: Some(PublishSettings::default()),
            function_update: Some(FunctionUpdateSettings::default()),
            trigger: Some(TriggerSettings::default()),
            invalidation: Some(InvalidationSettings::default()),
        }
    }

    /// Deployment targets taken from `EDGESHIP_*` variables. Blank values
    /// are ignored.
    pub fn from_env() -> Self {
        let mut layer = Self::default();
        layer.object_store.bucket = env_value(ENV_BUCKET);
        layer.object_store.prefix = env_value(ENV_PREFIX);
        layer.function.name = env_value(ENV_FUNCTION);
        layer.edge.distribution_id = env_value(ENV_DISTRIBUTION);
        layer
    }

    /// Fill every leaf absent from `self` with the value from `fallback`.
    pub fn or(self, fallback: Self) -> Self {
        Self {
            object_store: RawObjectStore {
                bucket: self.object_store.bucket.or(fallback.object_store.bucket),
                prefix: self.object_store.prefix.or(fallback.object_store.prefix),
                region: self.object_store.region.or(fallback.object_store.region),
            },
            function: RawFunction {
                name: self.function.name.or(fallback.function.name),
                region: self.function.region.or(fallback.function.region),
            },
            edge: RawEdge {
                distribution_id: self.edge.distribution_id.or(fallback.edge.distribution_id),
                region: self.edge.region.or(fallback.edge.region),
            },
            build: RawBuild {
                static_dir: self.build.static_dir.or(fallback.build.static_dir),
                server_dir: self.build.server_dir.or(fallback.build.server_dir),
                prerendered_dir: self.build.prerendered_dir.or(fallback.build.prerendered_dir),
                output_dir: self.build.output_dir.or(fallback.build.output_dir),
            },
            publish: self.publish.or(fallback.publish),
            function_update: self.function_update.or(fallback.function_update),
            trigger: self.trigger.or(fallback.trigger),
            invalidation: self.invalidation.or(fallback.invalidation),
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
