//! CLI integration tests for envpack.
//!
//! These tests exercise path resolution and the stage preconditions; the
//! network-bound and interpreter-bound paths are covered by unit tests
//! against fabricated layouts.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the envpack binary command, with the platform env scrubbed so tests
/// control it explicitly.
fn envpack() -> Command {
    let mut cmd = Command::cargo_bin("envpack").unwrap();
    cmd.env_remove("ENVPACK_PLATFORM");
    cmd
}

/// Create a temporary directory for a fake repository.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

// ============================================================================
// platform selection
// ============================================================================

#[test]
fn test_missing_platform_prints_usage() {
    let tmp = temp_dir();

    envpack()
        .args(["paths"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--platform"));
}

#[test]
fn test_unsupported_platform_is_fatal() {
    let tmp = temp_dir();

    envpack()
        .args(["paths", "--platform", "npu9000"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported platform"))
        .stderr(predicate::str::contains("arc, ultra, ultra2"));
}

#[test]
fn test_platform_read_from_environment() {
    let tmp = temp_dir();

    envpack()
        .args(["paths"])
        .env("ENVPACK_PLATFORM", "ultra")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("requirements-ultra.txt"));
}

// ============================================================================
// envpack paths
// ============================================================================

#[test]
fn test_paths_prints_resolved_layout() {
    let tmp = temp_dir();

    envpack()
        .args(["paths", "--platform", "arc"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("python-env"))
        .stdout(predicate::str::contains("offline/arc/prototype-python-env"))
        .stdout(predicate::str::contains("prototype-python-env-arc.7z"))
        .stdout(predicate::str::contains("requirements-arc.txt"));
}

#[test]
fn test_paths_json_roots_at_parent_of_known_subdir() {
    let tmp = temp_dir();
    let webui = tmp.path().join("webui");
    fs::create_dir(&webui).unwrap();

    let output = envpack()
        .args(["paths", "--platform", "arc", "--json"])
        .current_dir(&webui)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let repo_root = json["repo_root"].as_str().unwrap();
    assert_eq!(
        fs::canonicalize(repo_root).unwrap(),
        fs::canonicalize(tmp.path()).unwrap()
    );
}

#[test]
fn test_paths_json_keeps_other_cwd_as_root() {
    let tmp = temp_dir();

    let output = envpack()
        .args(["paths", "--platform", "ultra2", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let repo_root = json["repo_root"].as_str().unwrap();
    assert_eq!(
        fs::canonicalize(repo_root).unwrap(),
        fs::canonicalize(tmp.path()).unwrap()
    );
    assert_eq!(json["platform"], "ultra2");
}

// ============================================================================
// stage preconditions
// ============================================================================

#[test]
fn test_assemble_fails_without_fetched_resources() {
    let tmp = temp_dir();
    fs::create_dir(tmp.path().join("resources")).unwrap();

    envpack()
        .args(["assemble", "--platform", "arc"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no embeddable python zip"));
}

#[test]
fn test_install_fails_without_interpreter() {
    let tmp = temp_dir();
    fs::create_dir(tmp.path().join("python-env")).unwrap();

    envpack()
        .args(["install", "--platform", "arc"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("python executable not found"));
}

#[test]
fn test_pack_fails_without_environment() {
    let tmp = temp_dir();

    envpack()
        .args(["pack", "--platform", "arc"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

// ============================================================================
// envpack completions
// ============================================================================

#[test]
fn test_completions_bash() {
    envpack()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("envpack"));
}
