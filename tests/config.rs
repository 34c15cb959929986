// ABOUTME: Integration tests for configuration parsing and validation.
// ABOUTME: Tests YAML parsing, layer precedence, env overrides, and file discovery.

use edgeship::cloud::EventType;
use edgeship::config::*;
use edgeship::error::Error;
use std::fs;
use std::path::Path;
use std::time::Duration;

const TARGETS: &str = r#"
object_store:
  bucket: site-assets
function:
  name: site-renderer
edge:
  distribution_id: E2QWRUHEXAMPLE
"#;

const ENV_VARS: [&str; 4] = [ENV_BUCKET, ENV_PREFIX, ENV_FUNCTION, ENV_DISTRIBUTION];

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let config = Config::from_yaml(TARGETS).unwrap();
        let deployment = &config.deployment;
        assert_eq!(deployment.object_store.bucket.as_str(), "site-assets");
        assert!(deployment.object_store.prefix.is_none());
        assert_eq!(deployment.object_store.region.as_str(), "us-east-1");
        assert_eq!(deployment.function.name.as_str(), "site-renderer");
        assert_eq!(deployment.function.region.as_str(), "us-east-1");
        assert_eq!(deployment.edge.distribution_id.as_str(), "E2QWRUHEXAMPLE");
        assert_eq!(deployment.edge.region.as_str(), "us-east-1");
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
object_store:
  bucket: site-assets
  prefix: /releases/
  region: eu-west-1
function:
  name: site-renderer
  region: us-east-1
edge:
  distribution_id: E2QWRUHEXAMPLE
  region: us-east-1
build:
  static_dir: out/client
  server_dir: out/server
  prerendered_dir: out/prerendered
  output_dir: out/.deploy
publish:
  concurrency: 16
  strict: true
function_update:
  settle_timeout: 90s
  poll_interval: 500ms
trigger:
  event_type: viewer-request
  include_body: true
  max_attempts: 3
  min_delay: 100ms
  max_delay: 2s
invalidation:
  enabled: false
  paths:
    - /index.html
    - /assets/*
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(
            config.deployment.object_store.prefix.as_ref().unwrap().as_str(),
            "releases"
        );
        assert_eq!(config.deployment.object_store.region.as_str(), "eu-west-1");
        assert_eq!(config.build.static_dir, Path::new("out/client"));
        assert_eq!(
            config.build.prerendered_dir.as_deref(),
            Some(Path::new("out/prerendered"))
        );
        assert_eq!(config.publish.concurrency, 16);
        assert!(config.publish.strict);
        assert_eq!(config.function_update.settle_timeout, Duration::from_secs(90));
        assert_eq!(config.function_update.poll_interval, Duration::from_millis(500));
        assert_eq!(config.trigger.event_type, EventType::ViewerRequest);
        assert!(config.trigger.include_body);
        assert_eq!(config.trigger.max_attempts, 3);
        assert!(!config.invalidation.enabled);
        let paths: Vec<_> = config.invalidation.paths.iter().map(|p| p.as_str()).collect();
        assert_eq!(paths, vec!["/index.html", "/assets/*"]);
    }

    #[test]
    fn defaults_fill_unset_sections() {
        let config = Config::from_yaml(TARGETS).unwrap();
        assert_eq!(config.build.static_dir, Path::new("build/static"));
        assert_eq!(config.build.server_dir, Path::new("build/server"));
        assert!(config.build.prerendered_dir.is_none());
        assert_eq!(config.build.output_dir, Path::new(".edgeship"));
        assert_eq!(config.publish, PublishSettings::default());
        assert_eq!(config.function_update, FunctionUpdateSettings::default());
        assert_eq!(config.trigger, TriggerSettings::default());
        assert!(config.invalidation.enabled);
        assert_eq!(config.invalidation.paths.head.as_str(), "/*");
    }

    #[test]
    fn slash_only_prefix_means_bucket_root() {
        let yaml = TARGETS.replace("bucket: site-assets", "bucket: site-assets\n  prefix: /");
        let config = Config::from_yaml(&yaml).unwrap();
        assert!(config.deployment.object_store.prefix.is_none());
    }
}

mod validation {
    use super::*;

    #[test]
    fn missing_bucket_names_the_field() {
        let yaml = "function:\n  name: f\nedge:\n  distribution_id: d\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::MissingField("object_store.bucket")));
        assert_eq!(err.to_string(), "object_store.bucket is required");
    }

    #[test]
    fn missing_function_names_the_field() {
        let yaml = "object_store:\n  bucket: site-assets\nedge:\n  distribution_id: d\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::MissingField("function.name")));
    }

    #[test]
    fn missing_distribution_names_the_field() {
        let yaml = "object_store:\n  bucket: site-assets\nfunction:\n  name: f\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::MissingField("edge.distribution_id")));
    }

    #[test]
    fn blank_bucket_counts_as_missing() {
        let yaml = TARGETS.replace("bucket: site-assets", "bucket: \"\"");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, Error::MissingField("object_store.bucket")));
    }

    #[test]
    fn invalid_bucket_name_rejected() {
        let yaml = TARGETS.replace("site-assets", "Site_Assets");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(err.to_string().contains("object_store.bucket"));
    }

    #[test]
    fn invalid_function_name_rejected() {
        let yaml = TARGETS.replace("site-renderer", "site renderer");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(err.to_string().contains("function.name"));
    }

    #[test]
    fn zero_concurrency_rejected() {
        let yaml = format!("{TARGETS}publish:\n  concurrency: 0\n");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(err.to_string().contains("publish.concurrency"));
    }

    #[test]
    fn zero_trigger_attempts_rejected() {
        let yaml = format!("{TARGETS}trigger:\n  max_attempts: 0\n");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(err.to_string().contains("trigger.max_attempts"));
    }

    #[test]
    fn inverted_retry_delays_rejected() {
        let yaml = format!("{TARGETS}trigger:\n  min_delay: 10s\n  max_delay: 1s\n");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(err.to_string().contains("trigger.min_delay"));
    }

    #[test]
    fn zero_poll_interval_rejected() {
        let yaml = format!("{TARGETS}function_update:\n  poll_interval: 0s\n");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(err.to_string().contains("function_update.poll_interval"));
    }

    #[test]
    fn relative_invalidation_path_rejected() {
        let yaml = format!("{TARGETS}invalidation:\n  paths:\n    - index.html\n");
        assert!(Config::from_yaml(&yaml).is_err());
    }

    #[test]
    fn unknown_event_type_rejected() {
        let yaml = format!("{TARGETS}trigger:\n  event_type: on-click\n");
        assert!(Config::from_yaml(&yaml).is_err());
    }
}

mod layering {
    use super::*;

    #[test]
    fn env_overrides_file_targets() {
        temp_env::with_vars(
            [
                (ENV_BUCKET, Some("env-bucket")),
                (ENV_PREFIX, Some("preview")),
                (ENV_FUNCTION, Some("env-renderer")),
                (ENV_DISTRIBUTION, Some("EENVDIST")),
            ],
            || {
                let file = RawConfig::from_yaml(TARGETS).unwrap();
                let config =
                    Config::from_layers(file, RawConfig::from_env(), Path::new("/srv/site"))
                        .unwrap();
                let deployment = &config.deployment;
                assert_eq!(deployment.object_store.bucket.as_str(), "env-bucket");
                assert_eq!(
                    deployment.object_store.prefix.as_ref().unwrap().as_str(),
                    "preview"
                );
                assert_eq!(deployment.function.name.as_str(), "env-renderer");
                assert_eq!(deployment.edge.distribution_id.as_str(), "EENVDIST");
            },
        );
    }

    #[test]
    fn blank_env_value_does_not_override_file() {
        temp_env::with_vars(
            [(ENV_BUCKET, Some("   ")), (ENV_FUNCTION, None::<&str>)],
            || {
                let file = RawConfig::from_yaml(TARGETS).unwrap();
                let config =
                    Config::from_layers(file, RawConfig::from_env(), Path::new("")).unwrap();
                assert_eq!(config.deployment.object_store.bucket.as_str(), "site-assets");
                assert_eq!(config.deployment.function.name.as_str(), "site-renderer");
            },
        );
    }

    #[test]
    fn env_alone_can_supply_targets() {
        temp_env::with_vars(
            [
                (ENV_BUCKET, Some("env-bucket")),
                (ENV_PREFIX, None),
                (ENV_FUNCTION, Some("env-renderer")),
                (ENV_DISTRIBUTION, Some("EENVDIST")),
            ],
            || {
                let config = Config::from_layers(
                    RawConfig::default(),
                    RawConfig::from_env(),
                    Path::new(""),
                )
                .unwrap();
                assert_eq!(config.deployment.object_store.bucket.as_str(), "env-bucket");
            },
        );
    }

    #[test]
    fn relative_build_paths_rebased_on_project() {
        let file = RawConfig::from_yaml(TARGETS).unwrap();
        let config =
            Config::from_layers(file, RawConfig::default(), Path::new("/srv/site")).unwrap();
        assert_eq!(config.build.static_dir, Path::new("/srv/site/build/static"));
        assert_eq!(config.build.output_dir, Path::new("/srv/site/.edgeship"));
    }
}

mod discovery {
    use super::*;

    #[test]
    fn finds_edgeship_yml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), TARGETS).unwrap();

        temp_env::with_vars_unset(ENV_VARS, || {
            let config = Config::discover(dir.path()).unwrap();
            assert_eq!(config.deployment.function.name.as_str(), "site-renderer");
            assert_eq!(config.build.static_dir, dir.path().join("build/static"));
        });
    }

    #[test]
    fn finds_yaml_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_ALT), TARGETS).unwrap();

        assert_eq!(
            Config::locate(dir.path()).unwrap(),
            dir.path().join(CONFIG_FILENAME_ALT)
        );
    }

    #[test]
    fn dot_directory_config_rebases_on_project_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".edgeship")).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_DIR), TARGETS).unwrap();

        temp_env::with_vars_unset(ENV_VARS, || {
            let config = Config::discover(dir.path()).unwrap();
            assert_eq!(config.build.server_dir, dir.path().join("build/server"));
        });
    }

    #[test]
    fn primary_file_name_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), TARGETS).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_ALT), "not: [valid").unwrap();

        assert_eq!(
            Config::locate(dir.path()).unwrap(),
            dir.path().join(CONFIG_FILENAME)
        );
    }

    #[test]
    fn missing_config_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::discover(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }
}

mod init {
    use super::*;

    #[test]
    fn init_writes_loadable_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = init_config(dir.path(), false).unwrap();
        assert_eq!(path, dir.path().join(CONFIG_FILENAME));

        temp_env::with_vars_unset(ENV_VARS, || {
            let config = Config::load(&path).unwrap();
            assert_eq!(config.trigger.event_type, EventType::OriginRequest);
        });
    }

    #[test]
    fn init_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "keep: me").unwrap();

        let err = init_config(dir.path(), false).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
        assert_eq!(
            fs::read_to_string(dir.path().join(CONFIG_FILENAME)).unwrap(),
            "keep: me"
        );

        init_config(dir.path(), true).unwrap();
        assert!(
            fs::read_to_string(dir.path().join(CONFIG_FILENAME))
                .unwrap()
                .contains("object_store:")
        );
    }
}
