//! Supervisor facade - the host-facing entry points.
//!
//! The host constructs a `Supervisor` explicitly and then drives it:
//! `boot` once at startup, `shutdown` once at exit, and the two callbacks
//! (`on_configuration_changing`, `on_busy_poll`) whenever its environment
//! asks. The callbacks are independent and may run concurrently with each
//! other and with the lifecycle calls.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use crate::adapters::{MemorySettings, SystemProcessTable, SystemServiceManager};
use crate::application::{
    BusyCheckState, BusyReporter, ConfigWatcher, ProcessTerminator, ServiceController,
};
use crate::config::SupervisorConfig;
use crate::domain::{BusyStatus, ChangeDecision, StartOutcome, StopOutcome};
use crate::ports::{ServiceLifecycle, SettingsSource};

/// Supervisor wired to the platform's service manager and process table.
pub type SystemSupervisor =
    Supervisor<ServiceController<SystemServiceManager, SystemProcessTable>, MemorySettings>;

/// Wires the lifecycle, the configuration watcher and the busy reporter.
pub struct Supervisor<L: ServiceLifecycle, G: SettingsSource> {
    config: SupervisorConfig,
    lifecycle: Arc<L>,
    watcher: ConfigWatcher<L, G>,
    reporter: BusyReporter,
}

impl<L: ServiceLifecycle, G: SettingsSource> Supervisor<L, G> {
    /// Create a supervisor from its parts.
    pub fn new(lifecycle: Arc<L>, settings: Arc<G>, config: SupervisorConfig) -> Self {
        let busy_state = Arc::new(BusyCheckState::new());
        let watcher = ConfigWatcher::new(
            Arc::clone(&lifecycle),
            settings,
            Arc::clone(&busy_state),
            config.watched_keys(),
            config.restart_stop_config(),
        );
        let reporter = BusyReporter::new(busy_state);

        Self {
            config,
            lifecycle,
            watcher,
            reporter,
        }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> &Arc<L> {
        &self.lifecycle
    }

    pub fn watcher(&self) -> &ConfigWatcher<L, G> {
        &self.watcher
    }

    pub fn reporter(&self) -> &BusyReporter {
        &self.reporter
    }

    /// Start the service, then load the busy-check path from the settings.
    pub fn boot(&self) -> StartOutcome {
        let outcome = self.lifecycle.start(&self.config.start_config());
        self.watcher.refresh_busy_check();
        info!(service = %self.config.service_name, outcome = %outcome, "Boot finished");
        outcome
    }

    /// Stop the service using the configured terminate-on-timeout policy.
    pub fn shutdown(&self) -> StopOutcome {
        self.shutdown_with(self.config.terminate_on_timeout)
    }

    /// Stop the service, overriding the terminate-on-timeout policy.
    pub fn shutdown_with(&self, terminate_on_timeout: bool) -> StopOutcome {
        let stop = self
            .config
            .stop_config()
            .with_terminate_on_timeout(terminate_on_timeout);
        let outcome = self.lifecycle.stop(&stop);
        info!(service = %self.config.service_name, outcome = %outcome, "Shutdown finished");
        outcome
    }

    /// Host callback: the environment's configuration is about to change.
    pub fn on_configuration_changing(&self, changed_keys: &HashSet<String>) -> ChangeDecision {
        self.watcher.on_configuration_changing(changed_keys)
    }

    /// Host callback: the environment polls whether this instance is busy.
    pub fn on_busy_poll(&self) -> BusyStatus {
        self.reporter.on_busy_poll()
    }
}

impl Supervisor<ServiceController<SystemServiceManager, SystemProcessTable>, MemorySettings> {
    /// Create a supervisor over the platform adapters.
    pub fn system(config: SupervisorConfig, settings: Arc<MemorySettings>) -> SystemSupervisor {
        let controller = ServiceController::new(
            SystemServiceManager::new(),
            ProcessTerminator::new(SystemProcessTable::new()),
        );
        Supervisor::new(Arc::new(controller), settings, config)
    }
}
