//! Integration tests for `hostprep run` that never reach provisioning.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

#[cfg(not(windows))]
#[test]
fn test_run_refuses_on_non_windows_host() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    Command::new(assert_cmd::cargo::cargo_bin!("hostprep"))
        .env("NO_COLOR", "1")
        .env("HOSTPREP_CONFIG", dir.path().join("config.yaml"))
        .args(["run", "--yes", "--no-pause"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Windows hosts only"));
}

#[test]
fn test_run_rejects_unknown_strategy_before_doing_anything() {
    Command::new(assert_cmd::cargo::cargo_bin!("hostprep"))
        .args(["run", "--strategy", "eventually"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid value for package_manager.strategy"));
}
