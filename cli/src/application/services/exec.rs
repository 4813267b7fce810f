//! Shared helpers for running a domain `Invocation` through a `CommandRunner`.

use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::CommandRunner;
use crate::domain::Invocation;

/// Run `inv` to completion, logging the command line and any non-zero exit.
pub(crate) async fn run(runner: &impl CommandRunner, inv: &Invocation) -> Result<Output> {
    tracing::debug!(command = %inv.display(), "running");
    let output = runner
        .run(&inv.program, &inv.arg_refs())
        .await
        .with_context(|| format!("running {}", inv.program))?;
    log_exit(inv, &output);
    Ok(output)
}

/// Run `inv` with extra environment variables for the child only.
pub(crate) async fn run_with_env(
    runner: &impl CommandRunner,
    inv: &Invocation,
    env: &[(&str, &str)],
) -> Result<Output> {
    tracing::debug!(command = %inv.display(), env = ?env.iter().map(|(k, _)| *k).collect::<Vec<_>>(), "running");
    let output = runner
        .run_with_env(&inv.program, &inv.arg_refs(), env)
        .await
        .with_context(|| format!("running {}", inv.program))?;
    log_exit(inv, &output);
    Ok(output)
}

fn log_exit(inv: &Invocation, output: &Output) {
    if output.status.success() {
        tracing::debug!(command = %inv.display(), "exited successfully");
    } else {
        tracing::warn!(command = %inv.display(), status = ?output.status.code(), "non-zero exit");
    }
}

pub(crate) fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

pub(crate) fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}
