//! Integration tests for `hostprep plan`.
//!
//! Every test points `HOSTPREP_CONFIG` at a temp path so the user's real
//! config is never read.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn hostprep(config_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hostprep"));
    cmd.env("NO_COLOR", "1")
        .env("HOSTPREP_CONFIG", config_dir.path().join("config.yaml"));
    cmd
}

#[test]
fn test_plan_lists_commands_in_order() {
    let dir = TempDir::new().expect("temp dir");
    let output = hostprep(&dir).arg("plan").output().expect("run binary");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let positions: Vec<usize> = [
        "dism.exe /Online /Add-Capability",
        "sc.exe query sshd",
        "sc.exe config sshd start= auto",
        "netsh advfirewall firewall add rule name=SSH",
        "python-3.12.6-amd64.exe",
        "powershell.exe -ExecutionPolicy Bypass",
        "choco.exe install 7zip -y",
    ]
    .iter()
    .map(|needle| {
        stdout
            .find(needle)
            .unwrap_or_else(|| panic!("missing `{needle}` in:\n{stdout}"))
    })
    .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted, "actions out of order:\n{stdout}");
}

#[test]
fn test_plan_deferred_writes_batch_file_instead_of_running_choco() {
    let dir = TempDir::new().expect("temp dir");
    hostprep(&dir)
        .args(["plan", "--strategy", "deferred"])
        .assert()
        .success()
        .stdout(predicate::str::contains("install-7zip.bat"))
        .stdout(predicate::str::contains("choco.exe install").not());
}

#[test]
fn test_plan_json_is_valid_and_complete() {
    let dir = TempDir::new().expect("temp dir");
    let output = hostprep(&dir)
        .args(["plan", "--json"])
        .output()
        .expect("run binary");
    assert!(output.status.success());

    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(v["strategy"], "immediate");
    assert_eq!(v["download_timeout_secs"], 600);
    let actions = v["actions"].as_array().expect("actions array");
    assert_eq!(actions.len(), 10);
    assert_eq!(actions[0]["step"], "enable_feature");
    assert_eq!(actions[0]["kind"], "run");
    assert_eq!(actions[0]["command"]["program"], "dism.exe");
    assert_eq!(actions[2]["when"], "service is not running");
    assert_eq!(actions[5]["kind"], "download");
}

#[test]
fn test_plan_follows_configured_strategy() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("config.yaml"),
        "package_manager:\n  strategy: deferred\n",
    )
    .expect("seed config");

    let output = hostprep(&dir)
        .args(["plan", "--json"])
        .output()
        .expect("run binary");
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(v["strategy"], "deferred");
    let last = v["actions"]
        .as_array()
        .and_then(|a| a.last())
        .expect("at least one action");
    assert_eq!(last["kind"], "write_file");
}
