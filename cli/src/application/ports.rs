//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::HostprepConfig;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program to completion and capture its output.
    ///
    /// There is no timeout: installers may legitimately run for a long time.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with extra environment variables set for that child only.
    async fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<Output>;
}

// ── HTTP Port ─────────────────────────────────────────────────────────────────

/// A fully-read HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstracts HTTP downloads so the pipeline can be tested without network access.
#[allow(async_fn_in_trait)]
pub trait HttpFetcher {
    /// Issue a GET and read the whole body.
    ///
    /// A non-2xx status is not an error at this level; callers decide.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure, timeout, or a broken body stream.
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit captured output of an external command.
    fn detail(&self, label: &str, text: &str);
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts the local filesystem operations the pipeline needs.
pub trait LocalFs {
    /// Check whether `path` exists.
    fn exists(&self, path: &Path) -> bool;
    /// Create a directory and all missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Write `content` to `path`, replacing any existing file.
    fn write(&self, path: &Path, content: &[u8]) -> Result<()>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the config, falling back to defaults when no file exists.
    fn load(&self) -> Result<HostprepConfig>;
    /// Persist the config.
    fn save(&self, config: &HostprepConfig) -> Result<()>;
    /// Location of the config file.
    fn path(&self) -> Result<PathBuf>;
}
