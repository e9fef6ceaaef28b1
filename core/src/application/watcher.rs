//! Configuration-change handling.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{ChangeDecision, ServiceSupervisorConfig, WatchedKeys};
use crate::ports::{ServiceLifecycle, SettingsSource};

use super::busy::BusyCheckState;

/// Translates configuration-changing notifications into supervisor actions.
///
/// A changed busy-check key refreshes the busy-check path. A changed server
/// identity key cannot be applied to the running service, so the service is
/// stopped (terminating on timeout) and the change is canceled, which makes
/// the host restart the whole unit.
pub struct ConfigWatcher<L: ServiceLifecycle, G: SettingsSource> {
    lifecycle: Arc<L>,
    settings: Arc<G>,
    busy_state: Arc<BusyCheckState>,
    keys: WatchedKeys,
    restart_stop: ServiceSupervisorConfig,
}

impl<L: ServiceLifecycle, G: SettingsSource> ConfigWatcher<L, G> {
    /// Create a watcher.
    ///
    /// `restart_stop` is the stop configuration used when an identity key
    /// changes; termination on timeout is always enabled for it.
    pub fn new(
        lifecycle: Arc<L>,
        settings: Arc<G>,
        busy_state: Arc<BusyCheckState>,
        keys: WatchedKeys,
        restart_stop: ServiceSupervisorConfig,
    ) -> Self {
        Self {
            lifecycle,
            settings,
            busy_state,
            keys,
            restart_stop: restart_stop.with_terminate_on_timeout(true),
        }
    }

    pub fn keys(&self) -> &WatchedKeys {
        &self.keys
    }

    pub fn busy_state(&self) -> &Arc<BusyCheckState> {
        &self.busy_state
    }

    /// Re-read the busy-check path from the settings.
    pub fn refresh_busy_check(&self) {
        let value = self.settings.get(&self.keys.busy_check_key);
        self.busy_state.store(value.as_deref());
        info!(
            key = %self.keys.busy_check_key,
            path = ?self.busy_state.load(),
            "Busy check path refreshed"
        );
    }

    /// Handle a configuration-changing notification.
    pub fn on_configuration_changing(&self, changed_keys: &HashSet<String>) -> ChangeDecision {
        if changed_keys.is_empty() {
            return ChangeDecision::Proceed;
        }

        if changed_keys.contains(&self.keys.busy_check_key) {
            self.refresh_busy_check();
        }

        let identity_changed = changed_keys.iter().any(|k| self.keys.is_identity_key(k));
        if !identity_changed {
            debug!(count = changed_keys.len(), "No restart-relevant settings changed");
            return ChangeDecision::Proceed;
        }

        info!(
            service = %self.restart_stop.service_name,
            "Server identity changed, stopping service and requesting restart"
        );
        let outcome = self.lifecycle.stop(&self.restart_stop);
        info!(
            service = %self.restart_stop.service_name,
            outcome = %outcome,
            "Service stop for restart finished"
        );

        ChangeDecision::Cancel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::settings::MemorySettings;
    use crate::domain::{StartOutcome, StopOutcome};
    use parking_lot::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct MockLifecycle {
        stops: Mutex<Vec<ServiceSupervisorConfig>>,
    }

    impl ServiceLifecycle for MockLifecycle {
        fn start(&self, _config: &ServiceSupervisorConfig) -> StartOutcome {
            StartOutcome::Started
        }

        fn stop(&self, config: &ServiceSupervisorConfig) -> StopOutcome {
            self.stops.lock().push(config.clone());
            StopOutcome::Stopped
        }
    }

    fn watcher() -> (
        ConfigWatcher<MockLifecycle, MemorySettings>,
        Arc<MockLifecycle>,
        Arc<MemorySettings>,
    ) {
        let lifecycle = Arc::new(MockLifecycle::default());
        let settings = Arc::new(MemorySettings::new());
        let watcher = ConfigWatcher::new(
            Arc::clone(&lifecycle),
            Arc::clone(&settings),
            Arc::new(BusyCheckState::new()),
            WatchedKeys::default(),
            ServiceSupervisorConfig::for_stop("agent").with_timeout(Duration::from_secs(30)),
        );
        (watcher, lifecycle, settings)
    }

    fn keys(keys: &[&str]) -> HashSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_unrelated_keys_do_nothing() {
        let (watcher, lifecycle, settings) = watcher();
        settings.set("BusyCheckPath", "/tmp/ready");

        let decision = watcher.on_configuration_changing(&keys(&["LogLevel", "Other"]));

        assert_eq!(decision, ChangeDecision::Proceed);
        assert!(lifecycle.stops.lock().is_empty());
        assert_eq!(watcher.busy_state().load(), None);
    }

    #[test]
    fn test_busy_key_refreshes_path() {
        let (watcher, lifecycle, settings) = watcher();
        settings.set("BusyCheckPath", "/tmp/ready");

        let decision = watcher.on_configuration_changing(&keys(&["BusyCheckPath"]));

        assert_eq!(decision, ChangeDecision::Proceed);
        assert!(lifecycle.stops.lock().is_empty());
        assert_eq!(
            watcher.busy_state().load(),
            Some(std::path::PathBuf::from("/tmp/ready"))
        );

        settings.remove("BusyCheckPath");
        watcher.on_configuration_changing(&keys(&["BusyCheckPath"]));
        assert_eq!(watcher.busy_state().load(), None);
    }

    #[test]
    fn test_identity_key_stops_and_cancels() {
        let (watcher, lifecycle, _settings) = watcher();

        let decision = watcher.on_configuration_changing(&keys(&["Role"]));

        assert_eq!(decision, ChangeDecision::Cancel);
        let stops = lifecycle.stops.lock();
        assert_eq!(stops.len(), 1);
        assert!(stops[0].terminate_on_timeout);
        assert_eq!(stops[0].timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_identity_and_busy_keys_together() {
        let (watcher, lifecycle, settings) = watcher();
        settings.set("BusyCheckPath", "/tmp/ready");

        let decision = watcher.on_configuration_changing(&keys(&[
            "BusyCheckPath",
            "ServerUrl",
            "Environment",
        ]));

        assert_eq!(decision, ChangeDecision::Cancel);
        assert_eq!(lifecycle.stops.lock().len(), 1);
        assert!(watcher.busy_state().load().is_some());
    }

    #[test]
    fn test_empty_change_set() {
        let (watcher, lifecycle, _settings) = watcher();

        assert_eq!(
            watcher.on_configuration_changing(&HashSet::new()),
            ChangeDecision::Proceed
        );
        assert!(lifecycle.stops.lock().is_empty());
    }
}
