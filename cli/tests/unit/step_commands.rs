//! Argument vectors for the capability and firewall steps.

use hostprep_cli::application::services::{feature, firewall};
use hostprep_cli::domain::config::SshConfig;

use crate::helpers::{Event, MockRunner, RecordingReporter, output};

#[tokio::test]
async fn enable_ssh_capability_calls_dism_with_capability_name() {
    let runner = MockRunner::new();
    let reporter = RecordingReporter::new();

    feature::enable_ssh_capability(&runner, &reporter, &SshConfig::default())
        .await
        .expect("step succeeds");

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "dism.exe");
    assert_eq!(
        calls[0].args,
        [
            "/Online",
            "/Add-Capability",
            "/CapabilityName:OpenSSH.Server~~~~0.0.1.0"
        ]
    );
}

#[tokio::test]
async fn enable_ssh_capability_non_zero_exit_is_a_warning() {
    let runner = MockRunner::new().respond("dism.exe", output(87, "Error: 87", ""));
    let reporter = RecordingReporter::new();

    let result = feature::enable_ssh_capability(&runner, &reporter, &SshConfig::default()).await;

    assert!(result.is_ok(), "DISM exit codes are not inspected");
    assert_eq!(reporter.messages(Event::Warn).len(), 1);
    assert!(
        reporter
            .messages(Event::Detail)
            .iter()
            .any(|d| d.starts_with("DISM output") && d.contains("Error: 87"))
    );
}

#[tokio::test]
async fn enable_ssh_capability_spawn_failure_is_an_error() {
    let runner = MockRunner::new().fail("dism.exe");
    let reporter = RecordingReporter::new();

    let err = feature::enable_ssh_capability(&runner, &reporter, &SshConfig::default())
        .await
        .expect_err("spawn failure propagates");
    assert!(format!("{err:#}").contains("dism.exe"));
}

#[tokio::test]
async fn add_firewall_rule_opens_tcp_22_inbound() {
    let runner = MockRunner::new().respond("netsh", output(0, "Ok.", ""));
    let reporter = RecordingReporter::new();

    firewall::add_firewall_rule(&runner, &reporter, &SshConfig::default())
        .await
        .expect("step succeeds");

    let calls = runner.calls_to("netsh");
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].args,
        [
            "advfirewall",
            "firewall",
            "add",
            "rule",
            "name=SSH",
            "dir=in",
            "action=allow",
            "protocol=TCP",
            "localport=22",
        ]
    );
    assert!(
        reporter
            .messages(Event::Detail)
            .contains(&"Firewall rule added: Ok.".to_string())
    );
}

#[tokio::test]
async fn add_firewall_rule_uses_configured_port() {
    let runner = MockRunner::new();
    let reporter = RecordingReporter::new();
    let ssh = SshConfig {
        port: 2222,
        ..SshConfig::default()
    };

    firewall::add_firewall_rule(&runner, &reporter, &ssh)
        .await
        .expect("step succeeds");

    let args = &runner.calls_to("netsh")[0].args;
    assert_eq!(args.last().map(String::as_str), Some("localport=2222"));
}
