//! Application service: start the SSH service and enable auto-start.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ProgressReporter};
use crate::application::services::exec;
use crate::domain::config::ServiceConfig;
use crate::domain::error::ProvisionError;
use crate::domain::invocation;
use crate::domain::service::{ServiceState, parse_sc_query};

/// Timeout for a single `sc.exe query`.
const QUERY_TIMEOUT: Duration = Duration::from_secs(15);

/// What the service step had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStartOutcome {
    AlreadyRunning,
    Started,
}

/// Polling budget for the start transition.
#[derive(Debug, Clone, Copy)]
pub struct ServiceWait {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl From<&ServiceConfig> for ServiceWait {
    fn from(cfg: &ServiceConfig) -> Self {
        Self {
            timeout: Duration::from_secs(cfg.start_timeout_secs),
            poll_interval: Duration::from_millis(cfg.poll_interval_ms),
        }
    }
}

/// Ensure `service` is running, then set its startup type to automatic.
///
/// The startup reconfiguration is issued exactly once whether or not the
/// service had to be started.
///
/// # Errors
///
/// Returns an error if the state cannot be queried, or if the service does
/// not reach `RUNNING` within `wait.timeout`.
pub async fn configure_ssh_service(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    service: &str,
    wait: ServiceWait,
) -> Result<ServiceStartOutcome> {
    let outcome = if query_state(runner, service).await? == ServiceState::Running {
        ServiceStartOutcome::AlreadyRunning
    } else {
        reporter.step(&format!("Starting {service} service..."));
        let output = exec::run(runner, &invocation::start_service(service)).await?;
        if !output.status.success() {
            tracing::warn!(service, stdout = %exec::stdout_text(&output), "sc start reported failure");
        }
        wait_for_running(runner, service, wait).await?;
        reporter.success(&format!("{service} service started"));
        ServiceStartOutcome::Started
    };

    let output = exec::run(runner, &invocation::set_auto_start(service))
        .await
        .with_context(|| format!("setting {service} to start automatically"))?;
    reporter.detail(
        "SSH service set to start automatically",
        &exec::stdout_text(&output),
    );
    reporter.success(&format!("{service} service is running"));

    Ok(outcome)
}

/// Query the current state of `service`.
///
/// # Errors
///
/// Returns an error if `sc.exe` cannot be run or its output has no state line.
pub async fn query_state(runner: &impl CommandRunner, service: &str) -> Result<ServiceState> {
    let inv = invocation::query_service(service);
    tracing::debug!(command = %inv.display(), "querying service state");
    let output = runner
        .run_with_timeout(&inv.program, &inv.arg_refs(), QUERY_TIMEOUT)
        .await
        .with_context(|| format!("querying {service} service"))?;
    let state = parse_sc_query(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
        ProvisionError::UnknownServiceState {
            service: service.to_string(),
        }
    })?;
    tracing::debug!(service, %state, "service state");
    Ok(state)
}

async fn wait_for_running(
    runner: &impl CommandRunner,
    service: &str,
    wait: ServiceWait,
) -> Result<()> {
    // A timeout too large to represent never expires.
    let deadline = tokio::time::Instant::now().checked_add(wait.timeout);
    loop {
        let state = query_state(runner, service).await?;
        if state == ServiceState::Running {
            return Ok(());
        }
        if deadline.is_some_and(|d| tokio::time::Instant::now() >= d) {
            return Err(ProvisionError::ServiceTimeout {
                service: service.to_string(),
                waited: wait.timeout,
                last_state: state.to_string(),
            }
            .into());
        }
        tokio::time::sleep(wait.poll_interval).await;
    }
}
