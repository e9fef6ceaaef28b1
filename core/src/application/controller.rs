//! Start/stop state machine for one named service.

use std::thread;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::domain::{
    ServiceState, ServiceStatus, ServiceSupervisorConfig, StartOutcome, StopOutcome,
};
use crate::error::{Error, Result};
use crate::ports::{ProcessTablePort, ServiceLifecycle, ServiceManagerPort};

use super::terminator::ProcessTerminator;

/// Application service controlling the lifecycle of a named service.
///
/// Every call resolves the service by name again; nothing about the service is
/// kept between calls. Faults are logged and turned into outcomes, so a failed
/// start or stop never aborts the caller's own startup or shutdown sequence.
pub struct ServiceController<S: ServiceManagerPort, P: ProcessTablePort> {
    manager: S,
    terminator: ProcessTerminator<P>,
}

impl<S: ServiceManagerPort, P: ProcessTablePort> ServiceController<S, P> {
    /// Create a new controller over the given service manager and terminator.
    pub fn new(manager: S, terminator: ProcessTerminator<P>) -> Self {
        Self {
            manager,
            terminator,
        }
    }

    /// Access the underlying service manager.
    pub fn manager(&self) -> &S {
        &self.manager
    }

    /// Access the process terminator used on stop timeouts.
    pub fn terminator(&self) -> &ProcessTerminator<P> {
        &self.terminator
    }

    /// Query the current status of a service.
    pub fn status(&self, name: &str) -> Result<ServiceStatus> {
        self.manager.query(name)
    }

    /// Start the service and wait until it is running or the timeout elapses.
    pub fn start(&self, config: &ServiceSupervisorConfig) -> StartOutcome {
        let name = config.service_name.as_str();
        info!(service = name, "Attempting to start service");

        match self.try_start(config) {
            Ok(outcome) => outcome,
            Err(e) => {
                log_unavailable(name, &e);
                StartOutcome::Unavailable
            }
        }
    }

    /// Stop the service and wait until it is stopped or the timeout elapses.
    ///
    /// With `terminate_on_timeout`, a stop that times out is escalated to a
    /// kill pass over the service's process tree.
    pub fn stop(&self, config: &ServiceSupervisorConfig) -> StopOutcome {
        let name = config.service_name.as_str();
        info!(service = name, "Attempting to stop service");

        match self.try_stop(config) {
            Ok(outcome) => outcome,
            Err(e) => {
                log_unavailable(name, &e);
                StopOutcome::Unavailable
            }
        }
    }

    fn try_start(&self, config: &ServiceSupervisorConfig) -> Result<StartOutcome> {
        let name = config.service_name.as_str();

        if self.manager.query(name)?.is_running() {
            info!(service = name, "Service previously running");
            return Ok(StartOutcome::AlreadyRunning);
        }

        self.manager.start(name)?;

        if self.wait_for(config, ServiceState::Running)? {
            info!(service = name, "Service started");
            Ok(StartOutcome::Started)
        } else {
            warn!(
                service = name,
                timeout_ms = config.timeout.as_millis() as u64,
                "Failed to start service within time allotted"
            );
            Ok(StartOutcome::TimedOut)
        }
    }

    fn try_stop(&self, config: &ServiceSupervisorConfig) -> Result<StopOutcome> {
        let name = config.service_name.as_str();

        if self.manager.query(name)?.is_stopped() {
            info!(service = name, "Service is not running");
            return Ok(StopOutcome::AlreadyStopped);
        }

        self.manager.stop(name)?;

        if self.wait_for(config, ServiceState::Stopped)? {
            info!(service = name, "Service stopped");
            return Ok(StopOutcome::Stopped);
        }

        warn!(
            service = name,
            timeout_ms = config.timeout.as_millis() as u64,
            "Failed to stop service within time allotted"
        );

        if !config.terminate_on_timeout {
            return Ok(StopOutcome::TimedOut);
        }

        self.terminate_service(name)
    }

    /// Kill the service's process tree after a stop timeout.
    ///
    /// The pid is read here, after the wait, and only used while the service
    /// still reports itself as not stopped.
    fn terminate_service(&self, name: &str) -> Result<StopOutcome> {
        let status = self.manager.query(name)?;

        if status.is_stopped() {
            info!(
                service = name,
                "Service stopped after the wait expired, nothing to terminate"
            );
            return Ok(StopOutcome::Stopped);
        }

        let Some(pid) = status.pid else {
            warn!(
                service = name,
                state = %status.state,
                "Service has no backing process, cannot terminate"
            );
            return Ok(StopOutcome::TimedOut);
        };

        info!(
            service = name,
            pid = pid,
            "Attempting to terminate service process and its children"
        );
        let report = self.terminator.kill(pid);
        if report.denied > 0 {
            warn!(
                service = name,
                pid = pid,
                denied = report.denied,
                "Some processes could not be terminated"
            );
        }

        Ok(StopOutcome::TerminatedForcefully)
    }

    /// Poll until the service reaches `target`. Returns false on timeout.
    ///
    /// A timeout too large to be represented as an `Instant` means no deadline.
    fn wait_for(&self, config: &ServiceSupervisorConfig, target: ServiceState) -> Result<bool> {
        let name = config.service_name.as_str();
        let deadline = Instant::now().checked_add(config.timeout);

        loop {
            let status = self.manager.query(name)?;
            if status.state == target {
                return Ok(true);
            }

            let pause = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(false);
                    }
                    config.poll_interval.min(deadline - now)
                }
                None => config.poll_interval,
            };

            debug!(service = name, state = %status.state, target = %target, "Waiting for service");
            thread::sleep(pause);
        }
    }
}

impl<S: ServiceManagerPort, P: ProcessTablePort> ServiceLifecycle for ServiceController<S, P> {
    fn start(&self, config: &ServiceSupervisorConfig) -> StartOutcome {
        ServiceController::start(self, config)
    }

    fn stop(&self, config: &ServiceSupervisorConfig) -> StopOutcome {
        ServiceController::stop(self, config)
    }
}

fn log_unavailable(name: &str, error: &Error) {
    match error {
        Error::PermissionDenied(_) => warn!(
            service = name,
            error = %error,
            "Invalid operation, is the supervisor running with elevated privileges"
        ),
        _ => warn!(service = name, error = %error, "Invalid operation on service"),
    }
}
