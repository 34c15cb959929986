// ABOUTME: Integration tests for the edgeship CLI commands.
// ABOUTME: Validates --help output, init behavior, offline packaging, and config errors.

mod support;

use assert_cmd::Command;
use edgeship::config::{ENV_BUCKET, ENV_DISTRIBUTION, ENV_FUNCTION, ENV_PREFIX};
use predicates::prelude::*;
use std::fs;
use support::{Project, archive_names};

fn edgeship_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("edgeship"));
    for var in [ENV_BUCKET, ENV_PREFIX, ENV_FUNCTION, ENV_DISTRIBUTION] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn help_shows_commands() {
    edgeship_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("package"))
        .stdout(predicate::str::contains("invalidate"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("edgeship.yml");

    edgeship_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .success();

    assert!(config_path.exists(), "edgeship.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("distribution_id:"));
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("edgeship.yml");

    fs::write(&config_path, "existing: config").unwrap();

    edgeship_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(&config_path).unwrap(), "existing: config");
}

#[test]
fn init_force_overwrites() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("edgeship.yml");
    fs::write(&config_path, "existing: config").unwrap();

    edgeship_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--force"])
        .assert()
        .success();

    assert!(fs::read_to_string(&config_path).unwrap().contains("object_store:"));
}

#[test]
fn deploy_without_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    edgeship_cmd()
        .current_dir(temp_dir.path())
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn deploy_reports_missing_target() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join("edgeship.yml"),
        "function:\n  name: f\nedge:\n  distribution_id: d\n",
    )
    .unwrap();

    edgeship_cmd()
        .current_dir(temp_dir.path())
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("object_store.bucket is required"));
}

#[test]
fn package_builds_archive_offline() {
    let project = Project::new();
    project.write_config();

    edgeship_cmd()
        .current_dir(project.path())
        .arg("package")
        .assert()
        .success()
        .stdout(predicate::str::contains("Packaged 2 files"));

    let archive = project.output_dir().join("function.zip");
    assert_eq!(
        archive_names(&archive),
        vec!["chunks/render.mjs", "index.mjs"]
    );
}

#[test]
fn repackaging_into_server_dir_does_not_nest_the_archive() {
    let project = Project::new();
    project.write_config();

    for _ in 0..2 {
        edgeship_cmd()
            .current_dir(project.path())
            .args(["package", "-o", "build/server/fn.zip"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Packaged 2 files"));
    }

    assert_eq!(
        archive_names(&project.server_dir().join("fn.zip")),
        vec!["chunks/render.mjs", "index.mjs"]
    );
}

#[test]
fn package_json_output_carries_summary() {
    let project = Project::new();
    let config_path = project.write_config();
    let destination = project.path().join("out.zip");

    let assert = edgeship_cmd()
        .current_dir(project.path())
        .args(["--json", "package", "--config"])
        .arg(&config_path)
        .arg("--output")
        .arg(&destination)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let last = stdout.lines().last().unwrap();
    let event: serde_json::Value = serde_json::from_str(last).unwrap();
    assert_eq!(event["event"], "success");
    assert_eq!(event["data"]["files"], 2);
    assert!(destination.exists());
}

#[test]
fn package_fails_without_server_output() {
    let project = Project::new();
    project.write_config();
    fs::remove_dir_all(project.server_dir()).unwrap();

    edgeship_cmd()
        .current_dir(project.path())
        .arg("package")
        .assert()
        .failure()
        .stderr(predicate::str::contains("build/server"));
}
