//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::domain::{Action, ArchiverOutcome, HostprepConfig, PlannedAction, ProvisionReport};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information. Printed even when quiet.
    pub fn render_version(&self, version: &str) {
        println!("hostprep {}", version.style(self.ctx.styles.bold));
    }

    /// Render the effective configuration.
    pub fn render_config(&self, config: &HostprepConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        let pm = &config.package_manager;
        for (key, value) in [
            ("package_manager.strategy:", pm.strategy.to_string()),
            (
                "download.timeout_secs:",
                config.download.timeout_secs.to_string(),
            ),
            (
                "paths.temp_dir:",
                config.paths.temp_dir.display().to_string(),
            ),
            (
                "service.start_timeout_secs:",
                config.service.start_timeout_secs.to_string(),
            ),
            ("runtime.installer_url:", config.runtime.installer_url.clone()),
        ] {
            println!("  {key:<30} {value}");
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["HOSTPREP_CONFIG", "HOSTPREP_LOG", "NO_COLOR"] {
            println!(
                "    {:<18} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }

    /// Render the actions a run would perform, grouped by step.
    pub fn render_plan(&self, plan: &[PlannedAction]) {
        let mut current = None;
        for (i, planned) in plan.iter().enumerate() {
            if current != Some(planned.step) {
                current = Some(planned.step);
                println!();
                self.ctx.header(planned.step.label());
            }
            let line = match &planned.action {
                Action::Run { command } => format!("run       {}", command.display()),
                Action::Download { url, dest } => {
                    format!("download  {url} -> {}", dest.display())
                }
                Action::WriteFile { path } => format!("write     {}", path.display()),
            };
            let when = planned
                .when
                .map(|w| format!("  (if {w})"))
                .unwrap_or_default();
            println!(
                "  {:>3}. {line}{}",
                i + 1,
                when.style(self.ctx.styles.dim)
            );
        }
        println!();
    }

    /// Render the end-of-run summary.
    pub fn render_report(&self, report: &ProvisionReport) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.kv("Strategy:", &report.strategy.to_string());
        self.ctx.kv("Final stage:", &report.current().to_string());
        let archiver = match &report.archiver {
            ArchiverOutcome::Installed => "installed".to_string(),
            ArchiverOutcome::FollowUpWritten { script } => {
                format!("pending, run {} after reboot", script.display())
            }
            ArchiverOutcome::Skipped { reason } => format!("skipped ({reason})"),
        };
        self.ctx.kv("7-Zip:", &archiver);
    }
}
