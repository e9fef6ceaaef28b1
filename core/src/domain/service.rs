//! Service domain model: run states, status snapshots, per-call configuration and outcomes.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default time to wait for a service to reach `Running`.
pub const DEFAULT_START_TIMEOUT: Duration = Duration::from_secs(30);

/// Default time to wait for a service to reach `Stopped`.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(60);

/// Default interval between status queries while waiting.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Run state of an OS service as reported by the service manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    Running,
    Stopped,
    StartPending,
    StopPending,
    ContinuePending,
    PausePending,
    Paused,
    /// Any state the platform reports that has no counterpart above.
    Other,
}

impl ServiceState {
    /// Returns true while the service is moving between two stable states.
    pub fn is_transitional(&self) -> bool {
        matches!(
            self,
            ServiceState::StartPending
                | ServiceState::StopPending
                | ServiceState::ContinuePending
                | ServiceState::PausePending
        )
    }

    /// Get a human-readable name for this state.
    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceState::Running => "running",
            ServiceState::Stopped => "stopped",
            ServiceState::StartPending => "start pending",
            ServiceState::StopPending => "stop pending",
            ServiceState::ContinuePending => "continue pending",
            ServiceState::PausePending => "pause pending",
            ServiceState::Paused => "paused",
            ServiceState::Other => "other",
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A point-in-time snapshot of a named service.
///
/// The snapshot may already be stale when it is acted upon; callers that need
/// the backing process id for a termination decision must query again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    /// Service name as known to the service manager.
    pub name: String,
    /// Current run state.
    pub state: ServiceState,
    /// Backing process id; `None` when the service has no live process.
    pub pid: Option<u32>,
}

impl ServiceStatus {
    /// Create a status snapshot. A pid of 0 is normalised to `None`.
    pub fn new(name: impl Into<String>, state: ServiceState, pid: Option<u32>) -> Self {
        Self {
            name: name.into(),
            state,
            pid: pid.filter(|p| *p != 0),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == ServiceState::Running
    }

    pub fn is_stopped(&self) -> bool {
        self.state == ServiceState::Stopped
    }
}

/// Configuration for a single start or stop call.
///
/// Built by the caller and consumed once; nothing here outlives the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSupervisorConfig {
    /// Name of the service to control.
    pub service_name: String,
    /// Maximum time to wait for the target state.
    pub timeout: Duration,
    /// Escalate a stop timeout to a forced process-tree kill.
    pub terminate_on_timeout: bool,
    /// Interval between status queries while waiting.
    pub poll_interval: Duration,
}

impl ServiceSupervisorConfig {
    /// Configuration for starting a service (30 second timeout).
    pub fn for_start(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            timeout: DEFAULT_START_TIMEOUT,
            terminate_on_timeout: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Configuration for stopping a service (60 second timeout, no termination).
    pub fn for_stop(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            timeout: DEFAULT_STOP_TIMEOUT,
            terminate_on_timeout: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_terminate_on_timeout(mut self, terminate: bool) -> Self {
        self.terminate_on_timeout = terminate;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Result of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartOutcome {
    /// The service reached `Running` within the timeout.
    Started,
    /// The service was already running; no start command was issued.
    AlreadyRunning,
    /// The service did not reach `Running` in time.
    TimedOut,
    /// The service could not be controlled (missing, insufficient privilege, ...).
    Unavailable,
}

/// Result of a stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopOutcome {
    /// The service reached `Stopped`.
    Stopped,
    /// The service was already stopped; no stop command was issued.
    AlreadyStopped,
    /// The service did not stop in time and was left running.
    TimedOut,
    /// The service did not stop in time and its process tree was killed.
    TerminatedForcefully,
    /// The service could not be controlled (missing, insufficient privilege, ...).
    Unavailable,
}

impl fmt::Display for StartOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StartOutcome::Started => "started",
            StartOutcome::AlreadyRunning => "already running",
            StartOutcome::TimedOut => "timed out",
            StartOutcome::Unavailable => "unavailable",
        };
        f.write_str(s)
    }
}

impl fmt::Display for StopOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopOutcome::Stopped => "stopped",
            StopOutcome::AlreadyStopped => "already stopped",
            StopOutcome::TimedOut => "timed out",
            StopOutcome::TerminatedForcefully => "terminated forcefully",
            StopOutcome::Unavailable => "unavailable",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let start = ServiceSupervisorConfig::for_start("agent");
        assert_eq!(start.timeout, Duration::from_secs(30));
        assert!(!start.terminate_on_timeout);

        let stop = ServiceSupervisorConfig::for_stop("agent").with_terminate_on_timeout(true);
        assert_eq!(stop.timeout, Duration::from_secs(60));
        assert!(stop.terminate_on_timeout);
        assert_eq!(stop.service_name, "agent");
    }

    #[test]
    fn test_zero_pid_is_none() {
        let status = ServiceStatus::new("agent", ServiceState::Stopped, Some(0));
        assert_eq!(status.pid, None);
        assert!(status.is_stopped());
    }

    #[test]
    fn test_transitional_states() {
        assert!(ServiceState::StopPending.is_transitional());
        assert!(ServiceState::StartPending.is_transitional());
        assert!(!ServiceState::Running.is_transitional());
        assert!(!ServiceState::Other.is_transitional());
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&StopOutcome::TerminatedForcefully).unwrap();
        assert_eq!(json, "\"terminated_forcefully\"");
    }
}
