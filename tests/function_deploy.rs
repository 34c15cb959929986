// ABOUTME: Integration tests for the function deployer against the in-memory platform.
// ABOUTME: Version numbering, readiness polling, processing failures, and busy functions.

use std::path::PathBuf;
use std::time::Duration;

use edgeship::cloud::memory::MemoryFunctions;
use edgeship::config::FunctionUpdateSettings;
use edgeship::deploy::{DeployErrorKind, deploy_function};
use edgeship::types::FunctionName;
use tempfile::TempDir;

fn settings() -> FunctionUpdateSettings {
    FunctionUpdateSettings {
        settle_timeout: Duration::from_secs(2),
        poll_interval: Duration::from_millis(1),
    }
}

fn archive(dir: &TempDir, contents: &[u8]) -> PathBuf {
    let path = dir.path().join("function.zip");
    std::fs::write(&path, contents).unwrap();
    path
}

fn name() -> FunctionName {
    FunctionName::new("f").unwrap()
}

#[tokio::test]
async fn publishes_next_version_with_new_code() {
    let dir = TempDir::new().unwrap();
    let functions = MemoryFunctions::new();
    functions.add_function("f", 4);

    let version = deploy_function(&functions, &name(), &archive(&dir, b"zip-v5"), &settings())
        .await
        .unwrap();

    assert_eq!(version.version, "5");
    assert_eq!(version.qualified_arn(), "arn:memory:function:f:5");
    assert_eq!(functions.published_versions("f").len(), 5);
    assert_eq!(functions.version_code("f", "5").unwrap().as_ref(), b"zip-v5");
    assert_eq!(functions.update_count(), 1);
}

#[tokio::test]
async fn first_version_of_fresh_function() {
    let dir = TempDir::new().unwrap();
    let functions = MemoryFunctions::new();
    functions.add_function("f", 0);

    let version = deploy_function(&functions, &name(), &archive(&dir, b"zip"), &settings())
        .await
        .unwrap();
    assert_eq!(version.version, "1");
}

#[tokio::test]
async fn waits_for_code_to_settle() {
    let dir = TempDir::new().unwrap();
    let functions = MemoryFunctions::new();
    functions.add_function("f", 1);
    functions.set_settle_polls(3);

    let version = deploy_function(&functions, &name(), &archive(&dir, b"zip"), &settings())
        .await
        .unwrap();
    assert_eq!(version.version, "2");
}

#[tokio::test]
async fn gives_up_after_settle_timeout() {
    let dir = TempDir::new().unwrap();
    let functions = MemoryFunctions::new();
    functions.add_function("f", 1);
    functions.set_settle_polls(u32::MAX);

    let err = deploy_function(
        &functions,
        &name(),
        &archive(&dir, b"zip"),
        &FunctionUpdateSettings {
            settle_timeout: Duration::from_millis(20),
            poll_interval: Duration::from_millis(5),
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::FunctionPublish);
    assert_eq!(functions.published_versions("f").len(), 1);
}

#[tokio::test]
async fn failed_processing_is_a_publish_error() {
    let dir = TempDir::new().unwrap();
    let functions = MemoryFunctions::new();
    functions.add_function("f", 2);
    functions.fail_next_update("f", "handler not found");

    let err = deploy_function(&functions, &name(), &archive(&dir, b"zip"), &settings())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::FunctionPublish);
    assert!(err.to_string().contains("handler not found"));
    assert_eq!(functions.published_versions("f").len(), 2);

    // The failure applies to one update only.
    let version = deploy_function(&functions, &name(), &archive(&dir, b"zip"), &settings())
        .await
        .unwrap();
    assert_eq!(version.version, "3");
}

#[tokio::test]
async fn update_in_progress_is_not_retried() {
    let dir = TempDir::new().unwrap();
    let functions = MemoryFunctions::new();
    functions.add_function("f", 2);
    functions.set_update_in_progress(true);

    let err = deploy_function(&functions, &name(), &archive(&dir, b"zip"), &settings())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::FunctionUpdate);
    assert_eq!(functions.update_count(), 0);
}

#[tokio::test]
async fn unknown_function_is_an_update_error() {
    let dir = TempDir::new().unwrap();
    let functions = MemoryFunctions::new();

    let err = deploy_function(&functions, &name(), &archive(&dir, b"zip"), &settings())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), DeployErrorKind::FunctionUpdate);
}

#[tokio::test]
async fn missing_archive_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let functions = MemoryFunctions::new();
    functions.add_function("f", 0);

    let err = deploy_function(
        &functions,
        &name(),
        &dir.path().join("missing.zip"),
        &settings(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), DeployErrorKind::Io);
}
