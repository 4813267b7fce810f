//! `hostprep run`: provision this host.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::application::services::provision::{ProvisionOptions, provision_host};
use crate::domain::{PackageManagerStrategy, ProvisionReport, check_platform};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fs::LocalFs;
use crate::infra::http::ReqwestFetcher;
use crate::output::OutputContext;
use crate::output::json;
use crate::output::reporter::TerminalReporter;

const PAUSE_PROMPT: &str = "Press any key to exit...";

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// How to install 7-Zip once Chocolatey is in place [default: from config]
    #[arg(long)]
    pub strategy: Option<PackageManagerStrategy>,

    /// Exit without waiting for a key press
    #[arg(long)]
    pub no_pause: bool,

    /// Exit with status 1 when provisioning fails
    #[arg(long)]
    pub exit_code: bool,
}

/// How a provisioning attempt ended, as seen by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conclusion {
    /// Every step ran. `complete` is `false` when 7-Zip was not installed.
    Finished { complete: bool },
    /// A step failed; `message` is the line printed for it.
    Failed { message: String },
}

impl Conclusion {
    #[must_use]
    pub fn from_result(result: &Result<ProvisionReport>) -> Self {
        match result {
            Ok(report) => Conclusion::Finished {
                complete: report.is_complete(),
            },
            Err(e) => Conclusion::Failed {
                message: failure_message(e),
            },
        }
    }

    /// Process status. A failure is only non-zero when `strict` is set.
    #[must_use]
    pub fn exit_status(&self, strict: bool) -> u8 {
        match self {
            Conclusion::Failed { .. } if strict => 1,
            _ => 0,
        }
    }
}

/// The line shown when a step aborts the run.
#[must_use]
pub fn failure_message(err: &anyhow::Error) -> String {
    format!("An error occurred: {err:#}")
}

/// Entry point for `hostprep run`.
///
/// A provisioning failure is reported and, unless `--exit-code` is given,
/// still exits with success.
///
/// # Errors
///
/// Returns an error if the host is not Windows, the config cannot be loaded,
/// or the confirmation prompt fails.
pub async fn run(app: &AppContext, args: &RunArgs) -> Result<ExitCode> {
    check_platform()?;
    let config = config_service::load_config(&app.config_store)?;
    let strategy = args.strategy.unwrap_or(config.package_manager.strategy);

    if !app.confirm(
        "Enable OpenSSH and install Python, Chocolatey and 7-Zip on this machine?",
        true,
    )? {
        app.output.info("Aborted.");
        return Ok(ExitCode::SUCCESS);
    }

    // JSON mode keeps stdout for the final document.
    let silent = OutputContext::new(true, true);
    let progress_ctx = if app.is_json() { &silent } else { &app.output };
    let reporter = TerminalReporter::new(progress_ctx);
    let runner = TokioCommandRunner::new();
    let http = ReqwestFetcher::new(progress_ctx.show_progress())?;
    let search_path = std::env::var_os("PATH").and_then(|p| p.into_string().ok());
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    tracing::info!(%strategy, "provisioning started");
    let result = provision_host(
        &runner,
        &http,
        &LocalFs,
        ProvisionOptions {
            reporter: &reporter,
            config: &config,
            strategy,
            search_path: search_path.as_deref(),
            generated_at: &generated_at,
        },
    )
    .await;

    match &result {
        Ok(report) => {
            if app.is_json() {
                println!("{}", json::to_pretty(report)?);
            } else {
                app.renderer().render_report(report);
                if report.is_complete() {
                    app.output
                        .info("Reboot the machine so PATH changes take effect.");
                }
            }
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "provisioning failed");
            if app.is_json() {
                println!(
                    "{}",
                    json::format_error(&format!("{e:#}"), "PROVISION_FAILED")?
                );
            } else {
                app.output.error(&failure_message(e));
            }
        }
    }

    if !args.no_pause && !app.is_json() {
        app.output.pause(PAUSE_PROMPT);
    }

    let conclusion = Conclusion::from_result(&result);
    Ok(ExitCode::from(conclusion.exit_status(args.exit_code)))
}
