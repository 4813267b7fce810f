//! External command lines the pipeline issues, built from config.
//!
//! Builders are pure so the exact argument vectors can be asserted in tests
//! and listed by `hostprep plan` without running anything.

use std::path::Path;

use serde::Serialize;

use crate::domain::config::{HostprepConfig, PackageManagerConfig, SshConfig};

pub const DISM: &str = "dism.exe";
pub const SC: &str = "sc.exe";
pub const NETSH: &str = "netsh";
pub const POWERSHELL: &str = "powershell.exe";

/// A program plus its argument vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Borrowed view of the arguments, as `CommandRunner` takes them.
    #[must_use]
    pub fn arg_refs(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }

    /// Command line for logs and `plan` output. Quotes arguments with spaces.
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(|part| {
                if part.contains(' ') {
                    format!("\"{part}\"")
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[must_use]
pub fn add_capability(ssh: &SshConfig) -> Invocation {
    Invocation::new(
        DISM,
        [
            "/Online".to_string(),
            "/Add-Capability".to_string(),
            format!("/CapabilityName:{}", ssh.capability),
        ],
    )
}

#[must_use]
pub fn query_service(service: &str) -> Invocation {
    Invocation::new(SC, ["query", service])
}

#[must_use]
pub fn start_service(service: &str) -> Invocation {
    Invocation::new(SC, ["start", service])
}

/// `sc.exe` requires the space after `start=`.
#[must_use]
pub fn set_auto_start(service: &str) -> Invocation {
    Invocation::new(SC, ["config", service, "start=", "auto"])
}

#[must_use]
pub fn add_firewall_rule(ssh: &SshConfig) -> Invocation {
    Invocation::new(
        NETSH,
        [
            "advfirewall".to_string(),
            "firewall".to_string(),
            "add".to_string(),
            "rule".to_string(),
            format!("name={}", ssh.firewall_rule),
            "dir=in".to_string(),
            "action=allow".to_string(),
            "protocol=TCP".to_string(),
            format!("localport={}", ssh.port),
        ],
    )
}

#[must_use]
pub fn run_runtime_installer(config: &HostprepConfig) -> Invocation {
    Invocation::new(
        config.runtime_installer_path().to_string_lossy(),
        config.runtime.installer_args.iter().cloned(),
    )
}

#[must_use]
pub fn run_bootstrap_script(script: &Path) -> Invocation {
    Invocation::new(
        POWERSHELL,
        [
            "-ExecutionPolicy".to_string(),
            "Bypass".to_string(),
            "-NoProfile".to_string(),
            "-File".to_string(),
            script.to_string_lossy().into_owned(),
        ],
    )
}

#[must_use]
pub fn install_archiver(pm: &PackageManagerConfig) -> Invocation {
    Invocation::new(
        pm.executable_path(),
        ["install", pm.archiver_package.as_str(), "-y"],
    )
}

/// Contents of the batch script the deferred strategy leaves for the operator.
#[must_use]
pub fn follow_up_script(pm: &PackageManagerConfig, generated_at: &str) -> String {
    format!(
        "@echo off\r\n\
         REM Generated by hostprep {version} on {generated_at}.\r\n\
         REM Run as administrator after rebooting.\r\n\
         \"{exe}\" install {package} -y\r\n",
        version = env!("CARGO_PKG_VERSION"),
        exe = pm.executable_path(),
        package = pm.archiver_package,
    )
}
