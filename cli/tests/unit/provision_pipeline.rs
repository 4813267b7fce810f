//! End-to-end pipeline runs against mocks.

use hostprep_cli::application::services::provision::{
    COMPLETION_MESSAGE, INCOMPLETE_MESSAGE, ProvisionOptions, provision_host,
};
use hostprep_cli::domain::{
    ArchiverOutcome, HostprepConfig, PackageManagerStrategy, ProvisionError, Stage, Step,
};

use crate::helpers::{
    Event, MemFs, MockHttp, MockRunner, RecordingReporter, has_provision_error, output,
};

fn all_downloads_ok(cfg: &HostprepConfig) -> MockHttp {
    MockHttp::new()
        .serve(&cfg.runtime.installer_url, 200, b"MZ")
        .serve(&cfg.package_manager.bootstrap_url, 200, b"# bootstrap")
}

fn options<'a>(
    reporter: &'a RecordingReporter,
    cfg: &'a HostprepConfig,
    strategy: PackageManagerStrategy,
) -> ProvisionOptions<'a, RecordingReporter> {
    ProvisionOptions {
        reporter,
        config: cfg,
        strategy,
        search_path: Some(r"C:\Windows"),
        generated_at: "2026-10-16 09:30:00",
    }
}

#[tokio::test]
async fn successful_run_reaches_done_and_announces_once() {
    let cfg = HostprepConfig::default();
    let runner = MockRunner::with_service_states(&["STOPPED", "RUNNING"]);
    let reporter = RecordingReporter::new();

    let report = provision_host(
        &runner,
        &all_downloads_ok(&cfg),
        &MemFs::new(),
        options(&reporter, &cfg, PackageManagerStrategy::Immediate),
    )
    .await
    .expect("pipeline succeeds");

    assert_eq!(report.current(), Stage::Done);
    assert!(report.is_complete());
    assert_eq!(
        report.stages,
        [
            Stage::Start,
            Stage::FeatureEnabled,
            Stage::ServiceRunning,
            Stage::FirewallConfigured,
            Stage::RuntimeInstalled,
            Stage::PackageManagerInstalled,
            Stage::ArchiverInstalled,
            Stage::Done,
        ]
    );
    assert_eq!(reporter.count(Event::Success, COMPLETION_MESSAGE), 1);
    assert_eq!(reporter.count(Event::Warn, INCOMPLETE_MESSAGE), 0);
}

#[tokio::test]
async fn programs_run_in_pipeline_order() {
    let cfg = HostprepConfig::default();
    let runner = MockRunner::new();
    let reporter = RecordingReporter::new();

    provision_host(
        &runner,
        &all_downloads_ok(&cfg),
        &MemFs::new(),
        options(&reporter, &cfg, PackageManagerStrategy::Immediate),
    )
    .await
    .expect("pipeline succeeds");

    let programs: Vec<String> = runner.calls().into_iter().map(|c| c.program).collect();
    let installer = cfg.runtime_installer_path().to_string_lossy().into_owned();
    assert_eq!(
        programs,
        [
            "dism.exe",
            "sc.exe",
            "sc.exe",
            "netsh",
            installer.as_str(),
            "powershell.exe",
            r"C:\ProgramData\chocolatey\bin\choco.exe",
        ]
    );
}

#[tokio::test]
async fn failure_stops_the_pipeline_and_names_the_step() {
    let cfg = HostprepConfig::default();
    let runner = MockRunner::new().fail("netsh");
    let http = all_downloads_ok(&cfg);
    let reporter = RecordingReporter::new();

    let err = provision_host(
        &runner,
        &http,
        &MemFs::new(),
        options(&reporter, &cfg, PackageManagerStrategy::Immediate),
    )
    .await
    .expect_err("firewall step fails");

    assert!(has_provision_error(&err, |e| matches!(
        e,
        ProvisionError::StepFailed {
            step: Step::ConfigureFirewall
        }
    )));
    assert!(format!("{err:#}").starts_with("Firewall rule failed"));
    assert!(http.requests().is_empty(), "later steps never start");
    assert_eq!(reporter.count(Event::Success, COMPLETION_MESSAGE), 0);
}

#[tokio::test]
async fn runtime_download_error_aborts_before_package_manager() {
    let cfg = HostprepConfig::default();
    let runner = MockRunner::new();
    let http = MockHttp::new().serve(&cfg.runtime.installer_url, 404, b"");
    let reporter = RecordingReporter::new();

    let err = provision_host(
        &runner,
        &http,
        &MemFs::new(),
        options(&reporter, &cfg, PackageManagerStrategy::Deferred),
    )
    .await
    .expect_err("runtime step fails");

    assert!(has_provision_error(&err, |e| matches!(
        e,
        ProvisionError::Http { status: 404, .. }
    )));
    assert!(has_provision_error(&err, |e| matches!(
        e,
        ProvisionError::StepFailed {
            step: Step::InstallRuntime
        }
    )));
    assert!(runner.calls_to("powershell.exe").is_empty());
}

#[tokio::test]
async fn deferred_follow_up_counts_as_complete() {
    let cfg = HostprepConfig::default();
    let reporter = RecordingReporter::new();
    let fs = MemFs::new();

    let report = provision_host(
        &MockRunner::new(),
        &all_downloads_ok(&cfg),
        &fs,
        options(&reporter, &cfg, PackageManagerStrategy::Deferred),
    )
    .await
    .expect("pipeline succeeds");

    assert!(report.stages.contains(&Stage::FollowUpScriptWritten));
    assert!(report.is_complete());
    assert!(fs.read(&cfg.follow_up_script_path()).is_some());
    assert_eq!(reporter.count(Event::Success, COMPLETION_MESSAGE), 1);
}

#[tokio::test]
async fn skipped_archiver_reaches_done_without_success_message() {
    let cfg = HostprepConfig::default();
    let runner =
        MockRunner::new().respond("powershell.exe", output(1, "", "The remote name could not be resolved"));
    let reporter = RecordingReporter::new();

    let report = provision_host(
        &runner,
        &all_downloads_ok(&cfg),
        &MemFs::new(),
        options(&reporter, &cfg, PackageManagerStrategy::Deferred),
    )
    .await
    .expect("deferred failure does not abort the run");

    assert_eq!(report.current(), Stage::Done);
    assert!(matches!(report.archiver, ArchiverOutcome::Skipped { .. }));
    assert!(!report.is_complete());
    assert_eq!(reporter.count(Event::Success, COMPLETION_MESSAGE), 0);
    assert_eq!(reporter.count(Event::Warn, INCOMPLETE_MESSAGE), 1);
}

#[tokio::test]
async fn failed_archiver_install_is_not_announced_as_success() {
    let cfg = HostprepConfig::default();
    let choco = cfg.package_manager.executable_path();
    let runner = MockRunner::with_service_states(&["RUNNING"])
        .respond(&choco, output(1, "", "The package was not found"));
    let reporter = RecordingReporter::new();

    let report = provision_host(
        &runner,
        &all_downloads_ok(&cfg),
        &MemFs::new(),
        options(&reporter, &cfg, PackageManagerStrategy::Immediate),
    )
    .await
    .expect("choco failure does not abort the run");

    assert_eq!(report.current(), Stage::Done);
    assert!(report.stages.contains(&Stage::ArchiverSkipped));
    assert!(!report.is_complete());
    assert_eq!(reporter.count(Event::Success, COMPLETION_MESSAGE), 0);
    assert_eq!(reporter.count(Event::Warn, INCOMPLETE_MESSAGE), 1);
}
