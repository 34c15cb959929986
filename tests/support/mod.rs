// ABOUTME: Shared fixtures for integration tests.
// ABOUTME: Builds throwaway project trees, resolved configs, and seeded in-memory clouds.

// Each test binary uses only part of this module.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use edgeship::cloud::memory::{DistributionConfig, MemoryCloud};
use edgeship::config::{Config, RawConfig};
use tempfile::TempDir;

pub const BUCKET: &str = "site-assets";
pub const PREFIX: &str = "p";
pub const FUNCTION: &str = "f";
pub const DISTRIBUTION: &str = "d";

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("edgeship=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A project directory holding a small framework build output.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let project = Self {
            dir: TempDir::new().unwrap(),
        };
        project.write("build/static/index.html", "<h1>hello</h1>");
        project.write("build/static/favicon.ico", "ico");
        project.write("build/static/assets/app.css", "body { margin: 0 }");
        project.write("build/static/assets/app.js", "console.log('app')");
        project.write("build/server/index.mjs", "export const handler = async () => ({});");
        project.write("build/server/chunks/render.mjs", "export default 1;");
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    pub fn static_dir(&self) -> PathBuf {
        self.path().join("build/static")
    }

    pub fn server_dir(&self) -> PathBuf {
        self.path().join("build/server")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.path().join(".edgeship")
    }

    /// Config file body targeting the fixture cloud, with short timings.
    pub fn yaml(&self) -> String {
        format!(
            "object_store:\n  bucket: {BUCKET}\n  prefix: {PREFIX}\n\
             function:\n  name: {FUNCTION}\n\
             edge:\n  distribution_id: {DISTRIBUTION}\n\
             function_update:\n  settle_timeout: 2s\n  poll_interval: 1ms\n\
             trigger:\n  min_delay: 1ms\n  max_delay: 5ms\n"
        )
    }

    /// Resolved config with build paths rebased on the project directory.
    pub fn config(&self) -> Config {
        let file = RawConfig::from_yaml(&self.yaml()).unwrap();
        Config::from_layers(file, RawConfig::default(), self.path()).unwrap()
    }

    /// Write `edgeship.yml` into the project and return its path.
    pub fn write_config(&self) -> PathBuf {
        let path = self.path().join("edgeship.yml");
        fs::write(&path, self.yaml()).unwrap();
        path
    }
}

/// An in-memory cloud with function `f` at `published` versions and
/// distribution `d` carrying a default behavior with no triggers.
pub fn seeded_cloud(published: usize) -> MemoryCloud {
    let cloud = MemoryCloud::in_memory();
    cloud.functions.add_function(FUNCTION, published);
    cloud
        .edge
        .insert_distribution(DISTRIBUTION, DistributionConfig::new("assets"));
    cloud
}

/// Entry names of a zip archive, sorted.
pub fn archive_names(path: &Path) -> Vec<String> {
    let file = fs::File::open(path).unwrap();
    let archive = zip::ZipArchive::new(file).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}
