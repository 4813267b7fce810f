//! Application service: the full host provisioning pipeline.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use anyhow::Result;

use crate::application::ports::{CommandRunner, HttpFetcher, LocalFs, ProgressReporter};
use crate::application::services::package_manager::{
    PackageManagerOptions, install_package_manager,
};
use crate::application::services::{feature, firewall, runtime, sshd};
use crate::domain::error::ProvisionError;
use crate::domain::{HostprepConfig, PackageManagerStrategy, ProvisionReport, Stage, Step};

/// Printed once when every step finished as intended.
pub const COMPLETION_MESSAGE: &str = "SSH setup and software installation completed successfully.";

/// Printed instead of `COMPLETION_MESSAGE` when the archiver was not installed.
pub const INCOMPLETE_MESSAGE: &str = "Provisioning finished, but 7-Zip was not installed.";

pub struct ProvisionOptions<'a, R: ProgressReporter> {
    pub reporter: &'a R,
    pub config: &'a HostprepConfig,
    pub strategy: PackageManagerStrategy,
    /// Starting search path for the package manager invocation. `None`
    /// leaves the child's inherited `PATH` alone.
    pub search_path: Option<&'a str>,
    /// Timestamp stamped into generated files.
    pub generated_at: &'a str,
}

/// Run every provisioning step in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the first step error, with `ProvisionError::StepFailed` attached
/// as context naming the step.
pub async fn provision_host(
    runner: &impl CommandRunner,
    http: &impl HttpFetcher,
    fs: &impl LocalFs,
    opts: ProvisionOptions<'_, impl ProgressReporter>,
) -> Result<ProvisionReport> {
    let ProvisionOptions {
        reporter,
        config,
        strategy,
        search_path,
        generated_at,
    } = opts;
    let mut report = ProvisionReport::new(strategy);

    feature::enable_ssh_capability(runner, reporter, &config.ssh)
        .await
        .map_err(|e| abort(e, Step::EnableFeature))?;
    advance(&mut report, Step::EnableFeature);

    sshd::configure_ssh_service(
        runner,
        reporter,
        &config.ssh.service_name,
        sshd::ServiceWait::from(&config.service),
    )
    .await
    .map_err(|e| abort(e, Step::ConfigureService))?;
    advance(&mut report, Step::ConfigureService);

    firewall::add_firewall_rule(runner, reporter, &config.ssh)
        .await
        .map_err(|e| abort(e, Step::ConfigureFirewall))?;
    advance(&mut report, Step::ConfigureFirewall);

    runtime::install_runtime(runner, http, fs, reporter, config)
        .await
        .map_err(|e| abort(e, Step::InstallRuntime))?;
    advance(&mut report, Step::InstallRuntime);

    let archiver = install_package_manager(
        runner,
        http,
        fs,
        reporter,
        &PackageManagerOptions {
            config,
            strategy,
            search_path,
            generated_at,
        },
    )
    .await
    .map_err(|e| abort(e, Step::InstallPackageManager))?;
    advance(&mut report, Step::InstallPackageManager);

    report.reach(archiver.stage());
    report.archiver = archiver;
    report.reach(Stage::Done);

    if report.is_complete() {
        reporter.success(COMPLETION_MESSAGE);
    } else {
        reporter.warn(INCOMPLETE_MESSAGE);
    }
    Ok(report)
}

fn advance(report: &mut ProvisionReport, step: Step) {
    let stage = step.completes();
    tracing::info!(%stage, "stage reached");
    report.reach(stage);
}

fn abort(err: anyhow::Error, step: Step) -> anyhow::Error {
    tracing::error!(step = step.label(), error = %format!("{err:#}"), "provisioning aborted");
    err.context(ProvisionError::StepFailed { step })
}
