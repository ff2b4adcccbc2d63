//! Command-line tests: run the `extforge` binary in a scratch project.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use extforge::config::ENV_KEYS;
use predicates::prelude::*;
use tempfile::TempDir;

fn extforge(project: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("extforge");
    cmd.current_dir(project.path());
    for key in ENV_KEYS {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn test_malformed_descriptor_is_fatal() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join("extforge.json"),
        r#"{"name": "p", "options": [{"name": "catch", "cmake": "CATCH_INCLUDE", "chek": "directory"}]}"#,
    )
    .unwrap();

    extforge(&project)
        .args(["configure", "--build-type", "RELEASE"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("extforge.json"));

    assert!(!project.path().join("build/configure.out.json").exists());
    assert!(!project.path().join("build").exists());
}

#[test]
fn test_configure_without_descriptor_uses_builtins() {
    let project = TempDir::new().unwrap();

    extforge(&project)
        .args(["configure", "--build-type", "RELEASE"])
        .assert()
        .success();

    let stored = fs::read_to_string(project.path().join("build/configure.out.json")).unwrap();
    assert!(stored.contains("\"CMAKE_BUILD_TYPE\": \"RELEASE\""));
}

#[test]
fn test_build_without_descriptor_fails() {
    let project = TempDir::new().unwrap();

    extforge(&project)
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("file not found"));
}
