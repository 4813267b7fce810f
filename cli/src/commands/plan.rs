//! `hostprep plan`: list what `run` would do without doing it.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::domain::{PackageManagerStrategy, build_plan};
use crate::output::json;

/// Arguments for the plan command.
#[derive(Args)]
pub struct PlanArgs {
    /// Show the plan for this 7-Zip strategy instead of the configured one
    #[arg(long)]
    pub strategy: Option<PackageManagerStrategy>,
}

/// Print every command and download a run would perform, in order.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded.
pub fn run(app: &AppContext, args: &PlanArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let strategy = args.strategy.unwrap_or(config.package_manager.strategy);
    let plan = build_plan(&config, strategy);

    if app.is_json() {
        let doc = serde_json::json!({
            "strategy": strategy,
            "download_timeout_secs": config.download.timeout_secs,
            "temp_dir": config.paths.temp_dir,
            "actions": plan,
        });
        println!("{}", json::to_pretty(&doc)?);
        return Ok(ExitCode::SUCCESS);
    }

    app.output.header(&format!("hostprep plan (strategy: {strategy})"));
    app.output.kv(
        "Download timeout:",
        &format!("{}s", config.download.timeout_secs),
    );
    app.output
        .kv("Temp directory:", &config.paths.temp_dir.display().to_string());
    app.renderer().render_plan(&plan);
    Ok(ExitCode::SUCCESS)
}
