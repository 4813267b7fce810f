//! The ordered list of actions a run performs, for `hostprep plan`.

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::config::{HostprepConfig, PackageManagerStrategy};
use crate::domain::invocation::{self, Invocation};
use crate::domain::stage::Step;

/// A single side effect of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    Run { command: Invocation },
    Download { url: String, dest: PathBuf },
    WriteFile { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedAction {
    pub step: Step,
    #[serde(flatten)]
    pub action: Action,
    /// Condition under which the action happens, if it is not unconditional.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<&'static str>,
}

impl PlannedAction {
    fn always(step: Step, action: Action) -> Self {
        Self {
            step,
            action,
            when: None,
        }
    }

    fn only_if(step: Step, action: Action, when: &'static str) -> Self {
        Self {
            step,
            action,
            when: Some(when),
        }
    }
}

fn run(command: Invocation) -> Action {
    Action::Run { command }
}

/// Every action a run with `config` and `strategy` performs, in order.
#[must_use]
pub fn build_plan(config: &HostprepConfig, strategy: PackageManagerStrategy) -> Vec<PlannedAction> {
    let service = config.ssh.service_name.as_str();
    let pm = &config.package_manager;
    let mut plan = vec![
        PlannedAction::always(Step::EnableFeature, run(invocation::add_capability(&config.ssh))),
        PlannedAction::always(Step::ConfigureService, run(invocation::query_service(service))),
        PlannedAction::only_if(
            Step::ConfigureService,
            run(invocation::start_service(service)),
            "service is not running",
        ),
        PlannedAction::always(Step::ConfigureService, run(invocation::set_auto_start(service))),
        PlannedAction::always(
            Step::ConfigureFirewall,
            run(invocation::add_firewall_rule(&config.ssh)),
        ),
        PlannedAction::always(
            Step::InstallRuntime,
            Action::Download {
                url: config.runtime.installer_url.clone(),
                dest: config.runtime_installer_path(),
            },
        ),
        PlannedAction::always(
            Step::InstallRuntime,
            run(invocation::run_runtime_installer(config)),
        ),
        PlannedAction::always(
            Step::InstallPackageManager,
            Action::Download {
                url: pm.bootstrap_url.clone(),
                dest: config.bootstrap_script_path(),
            },
        ),
        PlannedAction::always(
            Step::InstallPackageManager,
            run(invocation::run_bootstrap_script(&config.bootstrap_script_path())),
        ),
    ];
    plan.push(match strategy {
        PackageManagerStrategy::Immediate => PlannedAction::always(
            Step::InstallPackageManager,
            run(invocation::install_archiver(pm)),
        ),
        PackageManagerStrategy::Deferred => PlannedAction::only_if(
            Step::InstallPackageManager,
            Action::WriteFile {
                path: config.follow_up_script_path(),
            },
            "bootstrap wrote nothing to stderr",
        ),
    });
    plan
}
