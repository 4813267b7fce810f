//! Application services: use-case orchestration.
//!
//! Each service module implements one use case by composing domain
//! logic with port trait calls. Services import only from `crate::domain`
//! and `crate::application::ports`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

mod exec;

pub mod config_service;
pub mod download;
pub mod feature;
pub mod firewall;
pub mod package_manager;
pub mod provision;
pub mod runtime;
pub mod sshd;
