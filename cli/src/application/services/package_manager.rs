//! Application service: bootstrap Chocolatey and install 7-Zip through it.
//!
//! Two strategies exist for the archiver install. `Immediate` invokes the
//! package manager straight away with an amended search path; `Deferred`
//! writes a batch script for the operator because a freshly installed
//! package manager may not be usable until the machine has rebooted.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, HttpFetcher, LocalFs, ProgressReporter};
use crate::application::services::{download, exec};
use crate::domain::error::ProvisionError;
use crate::domain::invocation;
use crate::domain::search_path;
use crate::domain::{ArchiverOutcome, HostprepConfig, PackageManagerStrategy};

/// Inputs for the package-manager step.
pub struct PackageManagerOptions<'a> {
    pub config: &'a HostprepConfig,
    pub strategy: PackageManagerStrategy,
    /// Search path the archiver install starts from (usually the caller's
    /// `PATH`). `None` means the child inherits `PATH` unchanged.
    pub search_path: Option<&'a str>,
    /// Timestamp stamped into the follow-up script.
    pub generated_at: &'a str,
}

/// Install the package manager, then handle the archiver per `opts.strategy`.
///
/// # Errors
///
/// With `Immediate`, any failure to bootstrap is returned, while a non-zero
/// exit from the archiver install is reported as `ArchiverOutcome::Skipped`.
/// With `Deferred`, failures are logged and reported as
/// `ArchiverOutcome::Skipped` so the run can go on.
pub async fn install_package_manager(
    runner: &impl CommandRunner,
    http: &impl HttpFetcher,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    opts: &PackageManagerOptions<'_>,
) -> Result<ArchiverOutcome> {
    match opts.strategy {
        PackageManagerStrategy::Immediate => {
            install_immediate(runner, http, fs, reporter, opts).await
        }
        PackageManagerStrategy::Deferred => {
            match install_deferred(runner, http, fs, reporter, opts).await {
                Ok(outcome) => Ok(outcome),
                Err(e) => {
                    tracing::error!(error = ?e, "package manager step failed");
                    reporter.warn(&format!("Chocolatey installation failed: {e:#}"));
                    Ok(ArchiverOutcome::Skipped {
                        reason: format!("{e:#}"),
                    })
                }
            }
        }
    }
}

/// Download and run the bootstrap script, returning its captured stderr.
async fn bootstrap(
    runner: &impl CommandRunner,
    http: &impl HttpFetcher,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    config: &HostprepConfig,
) -> Result<String> {
    let script = config.bootstrap_script_path();
    reporter.step("Downloading Chocolatey installation script...");
    download::download_to(
        http,
        fs,
        &config.package_manager.bootstrap_url,
        &script,
        Duration::from_secs(config.download.timeout_secs),
    )
    .await
    .context("downloading Chocolatey installation script")?;

    reporter.step("Running Chocolatey installation script...");
    let output = exec::run(runner, &invocation::run_bootstrap_script(&script)).await?;
    reporter.detail("Chocolatey install output", &exec::stdout_text(&output));
    Ok(exec::stderr_text(&output))
}

async fn install_immediate(
    runner: &impl CommandRunner,
    http: &impl HttpFetcher,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    opts: &PackageManagerOptions<'_>,
) -> Result<ArchiverOutcome> {
    let pm = &opts.config.package_manager;
    let stderr = bootstrap(runner, http, fs, reporter, opts.config).await?;
    if stderr.is_empty() {
        reporter.success("Chocolatey installed");
    } else {
        reporter.detail("Chocolatey install errors", &stderr);
        reporter.warn("Chocolatey installer wrote to stderr; continuing");
    }

    reporter.step(&format!("Installing {} with Chocolatey...", pm.archiver_package));
    let install = invocation::install_archiver(pm);
    let result = if let Some(current) = opts.search_path {
        let path = search_path::amend(current, &pm.bin_dir);
        exec::run_with_env(runner, &install, &[("PATH", path.as_str())]).await
    } else {
        tracing::warn!("PATH is not valid Unicode; leaving it unchanged for the archiver install");
        exec::run(runner, &install).await
    };
    let output = result.with_context(|| format!("installing {}", pm.archiver_package))?;
    reporter.detail("7-Zip installation output", &exec::stdout_text(&output));

    if output.status.success() {
        reporter.success(&format!("{} installed", pm.archiver_package));
        return Ok(ArchiverOutcome::Installed);
    }

    reporter.detail("7-Zip installation errors", &exec::stderr_text(&output));
    reporter.warn(&format!(
        "Chocolatey reported a failure installing {}",
        pm.archiver_package
    ));
    let status = output
        .status
        .code()
        .map_or_else(|| "no exit code".to_string(), |c| format!("exit code {c}"));
    Ok(ArchiverOutcome::Skipped {
        reason: format!("{} install failed ({status})", pm.archiver_package),
    })
}

async fn install_deferred(
    runner: &impl CommandRunner,
    http: &impl HttpFetcher,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    opts: &PackageManagerOptions<'_>,
) -> Result<ArchiverOutcome> {
    let pm = &opts.config.package_manager;
    let stderr = bootstrap(runner, http, fs, reporter, opts.config).await?;
    if !stderr.is_empty() {
        reporter.detail("Chocolatey install errors", &stderr);
        return Err(ProvisionError::BootstrapFailed { stderr }.into());
    }
    reporter.success("Chocolatey installed");

    let script = opts.config.follow_up_script_path();
    let content = invocation::follow_up_script(pm, opts.generated_at);
    fs.write(&script, content.as_bytes())
        .context("writing follow-up script")?;
    reporter.success(&format!("Follow-up script written to {}", script.display()));
    reporter.warn(&format!(
        "Reboot, then run {} as administrator to install {}",
        script.display(),
        pm.archiver_package
    ));
    Ok(ArchiverOutcome::FollowUpWritten { script })
}
