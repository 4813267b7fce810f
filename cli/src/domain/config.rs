//! Domain types and validators for hostprep configuration.
//!
//! Pure functions only. No I/O or async.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "package_manager.strategy",
    "download.timeout_secs",
    "paths.temp_dir",
    "service.start_timeout_secs",
    "runtime.installer_url",
];
pub const VALID_STRATEGIES: &[&str] = &["immediate", "deferred"];
/// Upper bound for every timeout setting (one day).
pub const MAX_TIMEOUT_SECS: u64 = 86_400;
/// Upper bound for the service poll interval.
pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.hostprep/config.yaml`.
///
/// Every field defaults to the value a stock run uses, so an empty or
/// missing file provisions exactly the documented sequence.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct HostprepConfig {
    pub ssh: SshConfig,
    pub service: ServiceConfig,
    pub download: DownloadConfig,
    pub paths: PathsConfig,
    pub runtime: RuntimeConfig,
    pub package_manager: PackageManagerConfig,
}

/// OpenSSH capability, service and firewall settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SshConfig {
    pub capability: String,
    pub service_name: String,
    pub firewall_rule: String,
    pub port: u16,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            capability: "OpenSSH.Server~~~~0.0.1.0".to_string(),
            service_name: "sshd".to_string(),
            firewall_rule: "SSH".to_string(),
            port: 22,
        }
    }
}

/// How long to wait for the SSH service to come up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub start_timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            start_timeout_secs: 30,
            poll_interval_ms: 500,
        }
    }
}

/// HTTP download settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DownloadConfig {
    /// Client-side timeout for each download. Set to 60 to get the
    /// one-minute limit older installers effectively ran with.
    pub timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self { timeout_secs: 600 }
    }
}

/// Local filesystem locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    pub temp_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            temp_dir: PathBuf::from(r"C:\Temp"),
        }
    }
}

/// Interpreter runtime installer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuntimeConfig {
    pub installer_url: String,
    pub installer_file: String,
    pub installer_args: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            installer_url: "https://www.python.org/ftp/python/3.12.6/python-3.12.6-amd64.exe"
                .to_string(),
            installer_file: "python-installer.exe".to_string(),
            installer_args: vec![
                "/quiet".to_string(),
                "InstallAllUsers=1".to_string(),
                "PrependPath=1".to_string(),
            ],
        }
    }
}

/// Package manager bootstrap and archiver install settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PackageManagerConfig {
    pub strategy: PackageManagerStrategy,
    pub bootstrap_url: String,
    pub script_file: String,
    /// Directory the bootstrap script installs the package manager binary into.
    pub bin_dir: String,
    pub executable: String,
    pub archiver_package: String,
    pub follow_up_file: String,
}

impl Default for PackageManagerConfig {
    fn default() -> Self {
        Self {
            strategy: PackageManagerStrategy::default(),
            bootstrap_url: "https://community.chocolatey.org/install.ps1".to_string(),
            script_file: "install-chocolatey.ps1".to_string(),
            bin_dir: r"C:\ProgramData\chocolatey\bin".to_string(),
            executable: "choco.exe".to_string(),
            archiver_package: "7zip".to_string(),
            follow_up_file: "install-7zip.bat".to_string(),
        }
    }
}

impl PackageManagerConfig {
    /// Full path of the package manager executable, Windows-style.
    #[must_use]
    pub fn executable_path(&self) -> String {
        format!("{}\\{}", self.bin_dir.trim_end_matches('\\'), self.executable)
    }
}

impl HostprepConfig {
    #[must_use]
    pub fn runtime_installer_path(&self) -> PathBuf {
        self.paths.temp_dir.join(&self.runtime.installer_file)
    }

    #[must_use]
    pub fn bootstrap_script_path(&self) -> PathBuf {
        self.paths.temp_dir.join(&self.package_manager.script_file)
    }

    #[must_use]
    pub fn follow_up_script_path(&self) -> PathBuf {
        self.paths.temp_dir.join(&self.package_manager.follow_up_file)
    }
}

// ── Strategy ─────────────────────────────────────────────────────────────────

/// How the archiving utility gets installed once the package manager is in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManagerStrategy {
    /// Invoke the package manager right away with an amended search path.
    #[default]
    Immediate,
    /// Write a batch script for the operator to run after a reboot.
    Deferred,
}

impl fmt::Display for PackageManagerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageManagerStrategy::Immediate => f.write_str("immediate"),
            PackageManagerStrategy::Deferred => f.write_str("deferred"),
        }
    }
}

impl FromStr for PackageManagerStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "immediate" => Ok(PackageManagerStrategy::Immediate),
            "deferred" => Ok(PackageManagerStrategy::Deferred),
            other => Err(ConfigError::InvalidValue {
                key: "package_manager.strategy".to_string(),
                value: other.to_string(),
                valid: VALID_STRATEGIES.join(", "),
            }),
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |valid: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        valid: valid.to_string(),
    };
    match key {
        "package_manager.strategy" => {
            value.parse::<PackageManagerStrategy>()?;
        }
        "download.timeout_secs" | "service.start_timeout_secs" => {
            if !value
                .parse::<u64>()
                .is_ok_and(|n| (1..=MAX_TIMEOUT_SECS).contains(&n))
            {
                return Err(invalid(&format!("1 to {MAX_TIMEOUT_SECS} seconds")).into());
            }
        }
        "service.poll_interval_ms" => {
            if !value
                .parse::<u64>()
                .is_ok_and(|n| (1..=MAX_POLL_INTERVAL_MS).contains(&n))
            {
                return Err(invalid(&format!("1 to {MAX_POLL_INTERVAL_MS} milliseconds")).into());
            }
        }
        "paths.temp_dir" => {
            if value.trim().is_empty() {
                return Err(invalid("a non-empty directory path").into());
            }
        }
        "runtime.installer_url" | "package_manager.bootstrap_url" => {
            if !value.starts_with("https://") {
                return Err(invalid("an https:// URL").into());
            }
        }
        _ => {}
    }
    Ok(())
}

impl HostprepConfig {
    /// Check every value a loaded file may have set, not only the
    /// `config set` whitelist.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::InvalidValue` found.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("download.timeout_secs", self.download.timeout_secs.to_string()),
            (
                "service.start_timeout_secs",
                self.service.start_timeout_secs.to_string(),
            ),
            (
                "service.poll_interval_ms",
                self.service.poll_interval_ms.to_string(),
            ),
            ("paths.temp_dir", self.paths.temp_dir.display().to_string()),
            ("runtime.installer_url", self.runtime.installer_url.clone()),
            (
                "package_manager.bootstrap_url",
                self.package_manager.bootstrap_url.clone(),
            ),
        ];
        for (key, value) in &checks {
            validate_config_value(key, value)?;
        }
        Ok(())
    }
}

/// Applies a validated `key = value` pair to the config.
///
/// # Errors
///
/// Returns an error if the key or value fails validation.
pub fn apply_config_value(config: &mut HostprepConfig, key: &str, value: &str) -> Result<()> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;
    match key {
        "package_manager.strategy" => config.package_manager.strategy = value.parse()?,
        "download.timeout_secs" => config.download.timeout_secs = value.parse()?,
        "service.start_timeout_secs" => config.service.start_timeout_secs = value.parse()?,
        "paths.temp_dir" => config.paths.temp_dir = PathBuf::from(value),
        "runtime.installer_url" => config.runtime.installer_url = value.to_string(),
        _ => {}
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
