//! Service lifecycle port (interface).

use crate::domain::{ServiceSupervisorConfig, StartOutcome, StopOutcome};

/// Blocking start/stop of a named service.
///
/// Implementations absorb every fault into the returned outcome.
pub trait ServiceLifecycle: Send + Sync {
    fn start(&self, config: &ServiceSupervisorConfig) -> StartOutcome;

    fn stop(&self, config: &ServiceSupervisorConfig) -> StopOutcome;
}
