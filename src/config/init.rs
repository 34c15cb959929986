// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates an edgeship.yml template with every section spelled out.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

const TEMPLATE: &str = r#"# Static assets are uploaded here.
object_store:
  bucket: my-site-assets
  # prefix: assets
  region: us-east-1

# Serverless function that renders dynamic requests.
function:
  name: my-site-server
  region: us-east-1

# Edge distribution in front of both.
edge:
  distribution_id: E2QWRUHAPOMQZL
  region: us-east-1

build:
  static_dir: build/static
  server_dir: build/server
  # prerendered_dir: build/prerendered
  output_dir: .edgeship

publish:
  concurrency: 8
  strict: false

function_update:
  settle_timeout: 60s
  poll_interval: 1s

trigger:
  event_type: origin-request
  include_body: false
  max_attempts: 5

invalidation:
  enabled: true
  paths:
    - "/*"
"#;

/// Write a template config into `dir`, returning its path.
pub fn init_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, TEMPLATE)?;
    Ok(config_path)
}
