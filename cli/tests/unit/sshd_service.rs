//! SSH service start and auto-start configuration.

use std::time::Duration;

use hostprep_cli::application::services::sshd::{
    ServiceStartOutcome, ServiceWait, configure_ssh_service, query_state,
};
use hostprep_cli::domain::{ProvisionError, ServiceState};

use crate::helpers::{MockRunner, RecordingReporter, SERVICE_MISSING, has_provision_error};

fn fast_wait() -> ServiceWait {
    ServiceWait {
        timeout: Duration::from_millis(60),
        poll_interval: Duration::from_millis(5),
    }
}

fn count(runner: &MockRunner, verb: &str) -> usize {
    runner
        .calls_to("sc.exe")
        .iter()
        .filter(|c| c.is("sc.exe", verb))
        .count()
}

#[tokio::test]
async fn already_running_skips_start_and_configures_once() {
    let runner = MockRunner::with_service_states(&["RUNNING"]);
    let reporter = RecordingReporter::new();

    let outcome = configure_ssh_service(&runner, &reporter, "sshd", fast_wait())
        .await
        .expect("service step succeeds");

    assert_eq!(outcome, ServiceStartOutcome::AlreadyRunning);
    assert_eq!(count(&runner, "start"), 0);
    assert_eq!(count(&runner, "config"), 1);
    let config = runner
        .calls()
        .into_iter()
        .find(|c| c.is("sc.exe", "config"))
        .expect("config call");
    assert_eq!(config.args, ["config", "sshd", "start=", "auto"]);
}

#[tokio::test]
async fn stopped_service_is_started_then_polled_until_running() {
    let runner = MockRunner::with_service_states(&["STOPPED", "START_PENDING", "RUNNING"]);
    let reporter = RecordingReporter::new();

    let outcome = configure_ssh_service(&runner, &reporter, "sshd", fast_wait())
        .await
        .expect("service step succeeds");

    assert_eq!(outcome, ServiceStartOutcome::Started);
    assert_eq!(count(&runner, "start"), 1);
    assert_eq!(count(&runner, "query"), 3);
    assert_eq!(count(&runner, "config"), 1);

    let verbs: Vec<String> = runner
        .calls()
        .iter()
        .filter_map(|c| c.args.first().cloned())
        .collect();
    assert_eq!(verbs, ["query", "start", "query", "query", "config"]);
}

#[tokio::test]
async fn service_that_never_runs_times_out_without_configuring() {
    let runner = MockRunner::with_service_states(&["STOPPED", "START_PENDING"]);
    let reporter = RecordingReporter::new();

    let err = configure_ssh_service(&runner, &reporter, "sshd", fast_wait())
        .await
        .expect_err("should time out");

    assert!(has_provision_error(&err, |e| matches!(
        e,
        ProvisionError::ServiceTimeout { last_state, .. } if last_state == "START_PENDING"
    )));
    assert_eq!(count(&runner, "config"), 0);
}

#[tokio::test]
async fn missing_service_is_an_unknown_state_error() {
    let runner = MockRunner::with_service_states(&[SERVICE_MISSING]);
    let reporter = RecordingReporter::new();

    let err = configure_ssh_service(&runner, &reporter, "sshd", fast_wait())
        .await
        .expect_err("no state line to parse");

    assert!(has_provision_error(&err, |e| matches!(
        e,
        ProvisionError::UnknownServiceState { service } if service == "sshd"
    )));
    assert_eq!(count(&runner, "start"), 0);
    assert_eq!(count(&runner, "config"), 0);
}

#[tokio::test]
async fn query_state_parses_pending_states() {
    let runner = MockRunner::with_service_states(&["STOP_PENDING"]);
    let state = query_state(&runner, "sshd").await.expect("state line present");
    assert_eq!(state, ServiceState::StopPending);
}

#[tokio::test]
async fn unbounded_wait_still_starts_the_service() {
    let runner = MockRunner::with_service_states(&["STOPPED", "START_PENDING", "RUNNING"]);
    let reporter = RecordingReporter::new();
    let wait = ServiceWait {
        timeout: Duration::MAX,
        poll_interval: Duration::from_millis(1),
    };

    let outcome = configure_ssh_service(&runner, &reporter, "sshd", wait)
        .await
        .expect("no overflow computing the deadline");

    assert_eq!(outcome, ServiceStartOutcome::Started);
    assert_eq!(count(&runner, "config"), 1);
}
