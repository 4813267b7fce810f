//! Provisioning steps, the stages they reach, and the run report.
//!
//! `Start → FeatureEnabled → ServiceRunning → FirewallConfigured →
//! RuntimeInstalled → PackageManagerInstalled → {ArchiverInstalled |
//! FollowUpScriptWritten | ArchiverSkipped} → Done`

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::config::PackageManagerStrategy;

/// One unit of work in the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    EnableFeature,
    ConfigureService,
    ConfigureFirewall,
    InstallRuntime,
    InstallPackageManager,
}

impl Step {
    /// Every step, in the order the pipeline runs them.
    pub const ALL: [Step; 5] = [
        Step::EnableFeature,
        Step::ConfigureService,
        Step::ConfigureFirewall,
        Step::InstallRuntime,
        Step::InstallPackageManager,
    ];

    /// Human-readable name used in progress and error messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Step::EnableFeature => "OpenSSH capability",
            Step::ConfigureService => "SSH service configuration",
            Step::ConfigureFirewall => "Firewall rule",
            Step::InstallRuntime => "Python installation",
            Step::InstallPackageManager => "Chocolatey installation",
        }
    }

    /// The stage the pipeline is in once this step has succeeded.
    #[must_use]
    pub fn completes(self) -> Stage {
        match self {
            Step::EnableFeature => Stage::FeatureEnabled,
            Step::ConfigureService => Stage::ServiceRunning,
            Step::ConfigureFirewall => Stage::FirewallConfigured,
            Step::InstallRuntime => Stage::RuntimeInstalled,
            Step::InstallPackageManager => Stage::PackageManagerInstalled,
        }
    }
}

/// Pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Start,
    FeatureEnabled,
    ServiceRunning,
    FirewallConfigured,
    RuntimeInstalled,
    PackageManagerInstalled,
    ArchiverInstalled,
    FollowUpScriptWritten,
    ArchiverSkipped,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::FeatureEnabled => "feature enabled",
            Stage::ServiceRunning => "service running",
            Stage::FirewallConfigured => "firewall configured",
            Stage::RuntimeInstalled => "runtime installed",
            Stage::PackageManagerInstalled => "package manager installed",
            Stage::ArchiverInstalled => "archiver installed",
            Stage::FollowUpScriptWritten => "follow-up script written",
            Stage::ArchiverSkipped => "archiver skipped",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// What happened to the archiving utility at the end of the package-manager step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArchiverOutcome {
    /// Installed right away through the package manager.
    Installed,
    /// A batch script was written for the operator to run after a reboot.
    FollowUpWritten { script: PathBuf },
    /// Not installed; `reason` explains why.
    Skipped { reason: String },
}

impl ArchiverOutcome {
    /// The stage this outcome moves the pipeline into.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            ArchiverOutcome::Installed => Stage::ArchiverInstalled,
            ArchiverOutcome::FollowUpWritten { .. } => Stage::FollowUpScriptWritten,
            ArchiverOutcome::Skipped { .. } => Stage::ArchiverSkipped,
        }
    }
}

/// Summary of a pipeline run that reached its end.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    pub strategy: PackageManagerStrategy,
    /// Every stage visited, starting with `Start`.
    pub stages: Vec<Stage>,
    pub archiver: ArchiverOutcome,
}

impl ProvisionReport {
    #[must_use]
    pub fn new(strategy: PackageManagerStrategy) -> Self {
        Self {
            strategy,
            stages: vec![Stage::Start],
            archiver: ArchiverOutcome::Skipped {
                reason: "package manager step not reached".to_string(),
            },
        }
    }

    /// Record a stage transition.
    pub fn reach(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    /// The most recently reached stage.
    #[must_use]
    pub fn current(&self) -> Stage {
        self.stages.last().copied().unwrap_or(Stage::Start)
    }

    /// `true` when every step finished the way its strategy intends.
    ///
    /// A skipped archiver is not a completed installation even though the
    /// pipeline itself ran to `Done`.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current() == Stage::Done && !matches!(self.archiver, ArchiverOutcome::Skipped { .. })
    }
}
