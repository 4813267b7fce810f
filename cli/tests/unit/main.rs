//! Unit tests for hostprep CLI
//!
//! These tests use mocked dependencies and run fast without external I/O.

#![allow(clippy::expect_used, clippy::unwrap_used)]


mod property_tests;
mod provision_pipeline;
mod sshd_service;
mod step_commands;
