//! Domain layer: pure provisioning logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod invocation;
pub mod plan;
pub mod search_path;
pub mod service;
pub mod stage;

pub use config::{
    HostprepConfig, PackageManagerStrategy, apply_config_value, validate_config_key,
    validate_config_value,
};
pub use error::{ConfigError, ProvisionError};
pub use invocation::Invocation;
pub use plan::{Action, PlannedAction, build_plan};
pub use service::ServiceState;
pub use stage::{ArchiverOutcome, ProvisionReport, Stage, Step};

/// Refuse to provision anything but a Windows host.
///
/// # Errors
///
/// Returns `ProvisionError::UnsupportedPlatform` on any other OS.
pub fn check_platform() -> anyhow::Result<()> {
    check_platform_for(std::env::consts::OS)
}

fn check_platform_for(os: &str) -> anyhow::Result<()> {
    if os != "windows" {
        return Err(ProvisionError::UnsupportedPlatform { os: os.to_string() }.into());
    }
    Ok(())
}
