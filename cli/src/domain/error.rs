//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::time::Duration;

use thiserror::Error;

use crate::domain::stage::Step;

// ── Provisioning errors ──────────────────────────────────────────────────────

/// Errors raised by the provisioning pipeline.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("HTTP {status} while downloading {url}")]
    Http { url: String, status: u16 },

    #[error("service '{service}' did not reach RUNNING within {}s (last state: {last_state})", waited.as_secs())]
    ServiceTimeout {
        service: String,
        waited: Duration,
        last_state: String,
    },

    #[error("could not determine state of service '{service}' from sc.exe output")]
    UnknownServiceState { service: String },

    #[error("package manager bootstrap reported errors:\n{stderr}")]
    BootstrapFailed { stderr: String },

    /// Attached as context to the error that aborted the pipeline.
    #[error("{} failed", step.label())]
    StepFailed { step: Step },

    #[error("hostprep provisions Windows hosts only (current OS: {os})")]
    UnsupportedPlatform { os: String },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
