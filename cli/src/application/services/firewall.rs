//! Application service: open the inbound SSH firewall port.

use anyhow::Result;

use crate::application::ports::{CommandRunner, ProgressReporter};
use crate::application::services::exec;
use crate::domain::config::SshConfig;
use crate::domain::invocation;

/// Add an inbound allow rule for the SSH port.
///
/// Not idempotent: every call adds another rule with the same name.
///
/// # Errors
///
/// Returns an error if `netsh` cannot be spawned.
pub async fn add_firewall_rule(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    ssh: &SshConfig,
) -> Result<()> {
    reporter.step(&format!("Adding firewall rule for TCP port {}...", ssh.port));
    let inv = invocation::add_firewall_rule(ssh);
    let output = exec::run(runner, &inv).await?;
    reporter.detail("Firewall rule added", &exec::stdout_text(&output));

    if output.status.success() {
        reporter.success(&format!("Firewall rule '{}' added", ssh.firewall_rule));
    } else {
        reporter.warn("netsh reported a failure adding the firewall rule");
    }
    Ok(())
}
