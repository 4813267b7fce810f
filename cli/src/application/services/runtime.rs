//! Application service: download and silently install the Python runtime.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, HttpFetcher, LocalFs, ProgressReporter};
use crate::application::services::{download, exec};
use crate::domain::HostprepConfig;
use crate::domain::invocation;

/// Download the runtime installer and run it unattended.
///
/// The installer is only launched after a successful download. Its exit
/// code is logged but does not fail the step.
///
/// # Errors
///
/// Returns an error if the download fails (including a non-2xx status) or
/// the installer cannot be spawned.
pub async fn install_runtime(
    runner: &impl CommandRunner,
    http: &impl HttpFetcher,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    config: &HostprepConfig,
) -> Result<()> {
    let dest = config.runtime_installer_path();
    reporter.step("Downloading Python installer...");
    download::download_to(
        http,
        fs,
        &config.runtime.installer_url,
        &dest,
        Duration::from_secs(config.download.timeout_secs),
    )
    .await
    .context("downloading Python installer")?;

    reporter.step("Running Python installer...");
    let inv = invocation::run_runtime_installer(config);
    let output = exec::run(runner, &inv).await?;
    if output.status.success() {
        reporter.success("Python installed");
    } else {
        reporter.warn("Python installer exited with a non-zero status; continuing");
    }
    Ok(())
}
