//! Windows service state as reported by `sc.exe query`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// State of a Windows service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceState {
    Stopped,
    StartPending,
    StopPending,
    Running,
    ContinuePending,
    PausePending,
    Paused,
    Unknown(String),
}

impl ServiceState {
    fn from_name(name: &str) -> Self {
        match name {
            "STOPPED" => ServiceState::Stopped,
            "START_PENDING" => ServiceState::StartPending,
            "STOP_PENDING" => ServiceState::StopPending,
            "RUNNING" => ServiceState::Running,
            "CONTINUE_PENDING" => ServiceState::ContinuePending,
            "PAUSE_PENDING" => ServiceState::PausePending,
            "PAUSED" => ServiceState::Paused,
            other => ServiceState::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceState::Stopped => "STOPPED",
            ServiceState::StartPending => "START_PENDING",
            ServiceState::StopPending => "STOP_PENDING",
            ServiceState::Running => "RUNNING",
            ServiceState::ContinuePending => "CONTINUE_PENDING",
            ServiceState::PausePending => "PAUSE_PENDING",
            ServiceState::Paused => "PAUSED",
            ServiceState::Unknown(name) => name,
        };
        f.write_str(name)
    }
}

// `        STATE              : 4  RUNNING`
static STATE_LINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*STATE\s*:\s*\d+\s+([A-Z_]+)").ok());

/// Parse the `STATE` line of `sc.exe query <service>` output.
///
/// Returns `None` when the output has no state line, e.g. when the
/// service does not exist.
#[must_use]
pub fn parse_sc_query(stdout: &str) -> Option<ServiceState> {
    let re = STATE_LINE.as_ref()?;
    re.captures(stdout)
        .and_then(|c| c.get(1))
        .map(|m| ServiceState::from_name(m.as_str()))
}
