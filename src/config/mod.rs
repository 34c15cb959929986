// ABOUTME: Configuration types and loading for edgeship.yml.
// ABOUTME: Layers defaults, file, and environment, then validates into strong types.

mod deserialize;
mod init;
mod layer;
mod settings;

pub use init::init_config;
pub use layer::{
    ENV_BUCKET, ENV_DISTRIBUTION, ENV_FUNCTION, ENV_PREFIX, RawBuild, RawConfig, RawEdge,
    RawFunction, RawObjectStore,
};
pub use settings::{
    FunctionUpdateSettings, InvalidationSettings, PublishSettings, TriggerSettings,
};

use crate::error::{Error, Result};
use crate::types::{BucketName, DistributionId, FunctionName, KeyPrefix, Region};
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "edgeship.yml";
pub const CONFIG_FILENAME_ALT: &str = "edgeship.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".edgeship/config.yml";

/// Fully resolved configuration for one deployment run.
#[derive(Debug, Clone)]
pub struct Config {
    pub deployment: DeploymentConfig,
    pub build: BuildConfig,
    pub publish: PublishSettings,
    pub function_update: FunctionUpdateSettings,
    pub trigger: TriggerSettings,
    pub invalidation: InvalidationSettings,
}

/// Where each tier lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    pub object_store: ObjectStoreTarget,
    pub function: FunctionTarget,
    pub edge: EdgeTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectStoreTarget {
    pub bucket: BucketName,
    /// `None` uploads to the bucket root.
    pub prefix: Option<KeyPrefix>,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionTarget {
    pub name: FunctionName,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeTarget {
    pub distribution_id: DistributionId,
    pub region: Region,
}

/// Locations of the framework build output and of our own scratch space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub static_dir: PathBuf,
    pub server_dir: PathBuf,
    pub prerendered_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
}

impl Config {
    /// Parse a config file body without consulting the environment.
    /// Relative build paths stay relative to the working directory.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::from_layers(RawConfig::from_yaml(yaml)?, RawConfig::default(), Path::new(""))
    }

    /// Merge `env` over `file` over the built-in defaults and validate.
    pub fn from_layers(file: RawConfig, env: RawConfig, base_dir: &Path) -> Result<Self> {
        env.or(file).or(RawConfig::defaults()).resolve(base_dir)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file = RawConfig::from_yaml(&content)?;
        Self::from_layers(file, RawConfig::from_env(), &project_dir(path))
    }

    /// Find the config file in `dir`.
    pub fn locate(dir: &Path) -> Result<PathBuf> {
        [CONFIG_FILENAME, CONFIG_FILENAME_ALT, CONFIG_FILENAME_DIR]
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .ok_or_else(|| Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        Self::load(&Self::locate(dir)?)
    }
}

/// Directory that relative build paths are resolved against: the one
/// holding the config file, or the project root for `.edgeship/config.yml`.
fn project_dir(config_path: &Path) -> PathBuf {
    let parent = config_path.parent().unwrap_or(Path::new(""));
    match parent.file_name() {
        Some(name) if name == ".edgeship" => parent.parent().unwrap_or(Path::new("")).to_path_buf(),
        _ => parent.to_path_buf(),
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String> {
    value.ok_or(Error::MissingField(field))
}

fn invalid(field: &str, err: impl std::fmt::Display) -> Error {
    Error::InvalidConfig(format!("{}: {}", field, err))
}

fn rebase(base_dir: &Path, path: String) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}

impl RawConfig {
    /// Validate a fully merged layer.
    pub fn resolve(self, base_dir: &Path) -> Result<Config> {
        let bucket = required(self.object_store.bucket, "object_store.bucket")?;
        let store_region = required(self.object_store.region, "object_store.region")?;
        let function_name = required(self.function.name, "function.name")?;
        let function_region = required(self.function.region, "function.region")?;
        let distribution = required(self.edge.distribution_id, "edge.distribution_id")?;
        let edge_region = required(self.edge.region, "edge.region")?;

        let deployment = DeploymentConfig {
            object_store: ObjectStoreTarget {
                bucket: BucketName::new(&bucket).map_err(|e| invalid("object_store.bucket", e))?,
                prefix: self.object_store.prefix.as_deref().and_then(KeyPrefix::new),
                region: Region::new(&store_region)
                    .map_err(|e| invalid("object_store.region", e))?,
            },
            function: FunctionTarget {
                name: FunctionName::new(&function_name)
                    .map_err(|e| invalid("function.name", e))?,
                region: Region::new(&function_region).map_err(|e| invalid("function.region", e))?,
            },
            edge: EdgeTarget {
                distribution_id: DistributionId::new(distribution),
                region: Region::new(&edge_region).map_err(|e| invalid("edge.region", e))?,
            },
        };

        let build = BuildConfig {
            static_dir: rebase(base_dir, required(self.build.static_dir, "build.static_dir")?),
            server_dir: rebase(base_dir, required(self.build.server_dir, "build.server_dir")?),
            prerendered_dir: self.build.prerendered_dir.map(|p| rebase(base_dir, p)),
            output_dir: rebase(base_dir, required(self.build.output_dir, "build.output_dir")?),
        };

        let publish = self.publish.unwrap_or_default();
        if publish.concurrency == 0 {
            return Err(invalid("publish.concurrency", "must be at least 1"));
        }

        let function_update = self.function_update.unwrap_or_default();
        if function_update.poll_interval.is_zero() {
            return Err(invalid("function_update.poll_interval", "must be greater than zero"));
        }

        let trigger = self.trigger.unwrap_or_default();
        if trigger.max_attempts == 0 {
            return Err(invalid("trigger.max_attempts", "must be at least 1"));
        }
        if trigger.min_delay > trigger.max_delay {
            return Err(invalid("trigger.min_delay", "must not exceed trigger.max_delay"));
        }

        Ok(Config {
            deployment,
            build,
            publish,
            function_update,
            trigger,
            invalidation: self.invalidation.unwrap_or_default(),
        })
    }
}
