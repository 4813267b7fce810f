//! Application service: enable the OpenSSH server optional capability.

use anyhow::Result;

use crate::application::ports::{CommandRunner, ProgressReporter};
use crate::application::services::exec;
use crate::domain::config::SshConfig;
use crate::domain::invocation;

/// Ask DISM to add the OpenSSH server capability.
///
/// A non-zero DISM exit is reported as a warning, not an error: a missing
/// capability surfaces when the service step cannot find `sshd`.
///
/// # Errors
///
/// Returns an error only if `dism.exe` cannot be spawned.
pub async fn enable_ssh_capability(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    ssh: &SshConfig,
) -> Result<()> {
    reporter.step("Enabling OpenSSH server capability...");
    let inv = invocation::add_capability(ssh);
    let output = exec::run(runner, &inv).await?;
    reporter.detail("DISM output", &exec::stdout_text(&output));

    if output.status.success() {
        reporter.success("OpenSSH server capability enabled");
    } else {
        reporter.warn(&format!(
            "DISM exited with {}; continuing",
            output
                .status
                .code()
                .map_or_else(|| "no exit code".to_string(), |c| format!("code {c}"))
        ));
    }
    Ok(())
}
