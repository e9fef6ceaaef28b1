//! Run command - act as the hosting environment for the supervisor.
//!
//! Boots the service, then watches the configuration file. Changed settings
//! are applied and delivered as a configuration-changing notification; a
//! `Cancel` answer is honoured the way a real host would, by restarting the
//! unit (rebuilding the supervisor from the latest configuration and booting
//! again). Busy state is polled from its own task, so polls keep being
//! answered while a configuration-triggered stop is in flight. Ctrl-C shuts
//! down.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use svcwarden_core::config::diff_settings;
use svcwarden_core::ports::{ServiceLifecycle, SettingsSource};
use svcwarden_core::{
    BusyStatus, ChangeDecision, ConfigStore, MemorySettings, Supervisor, SupervisorConfig,
    SystemSupervisor,
};
use tokio::sync::watch;
use tracing::{info, warn};

pub async fn run(store: ConfigStore, watch_interval_ms: u64, busy_interval_ms: u64) -> Result<()> {
    let config = store.load().await?;
    config.require_service_name()?;

    let settings = Arc::new(MemorySettings::from_map(config.settings.clone()));
    let (current, supervisor) = watch::channel(boot(config, &settings).await?);

    let mut last_busy: Option<BusyStatus> = None;
    let busy = tokio::spawn(poll_busy(
        supervisor.clone(),
        Duration::from_millis(busy_interval_ms.max(100)),
        move |status| {
            if last_busy != Some(status) {
                info!(status = ?status, "Busy state");
                last_busy = Some(status);
            }
        },
    ));

    let mut changes = tokio::spawn(watch_config(
        store,
        settings,
        current,
        Duration::from_millis(watch_interval_ms.max(100)),
    ));

    let result = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(error = %e, "Failed to listen for Ctrl-C");
            }
            info!("Shutdown requested");
            Ok(())
        }
        finished = &mut changes => match finished {
            Ok(result) => result,
            Err(e) => Err(e.into()),
        },
    };

    changes.abort();
    busy.abort();

    let s = Arc::clone(&supervisor.borrow());
    let name = s.config().service_name.clone();
    let outcome = tokio::task::spawn_blocking(move || s.shutdown()).await?;
    println!("{}: {}", name, outcome);
    result
}

/// Reload the configuration file on every tick and deliver changed keys.
///
/// Returns only on a fault the host cannot recover from.
async fn watch_config(
    store: ConfigStore,
    settings: Arc<MemorySettings>,
    current: watch::Sender<Arc<SystemSupervisor>>,
    period: Duration,
) -> Result<()> {
    let mut ticks = tokio::time::interval(period);

    loop {
        ticks.tick().await;

        let latest = match store.load().await {
            Ok(latest) => latest,
            Err(e) => {
                warn!(error = %e, "Failed to reload configuration");
                continue;
            }
        };

        let changed = diff_settings(&settings.snapshot(), &latest.settings);
        if changed.is_empty() {
            continue;
        }

        info!(keys = ?changed, "Configuration changing");
        settings.replace(latest.settings.clone());

        let s = Arc::clone(&current.borrow());
        let decision =
            tokio::task::spawn_blocking(move || s.on_configuration_changing(&changed)).await?;

        if decision == ChangeDecision::Cancel {
            info!("Configuration change canceled, restarting");
            current.send_replace(boot(latest, &settings).await?);
        }
    }
}

/// Answer busy polls against whichever supervisor is current.
async fn poll_busy<L, G>(
    supervisor: watch::Receiver<Arc<Supervisor<L, G>>>,
    period: Duration,
    mut report: impl FnMut(BusyStatus),
) where
    L: ServiceLifecycle,
    G: SettingsSource,
{
    let mut ticks = tokio::time::interval(period);

    loop {
        ticks.tick().await;
        let s = Arc::clone(&supervisor.borrow());
        report(s.on_busy_poll());
    }
}

async fn boot(
    config: SupervisorConfig,
    settings: &Arc<MemorySettings>,
) -> Result<Arc<SystemSupervisor>> {
    let supervisor = Arc::new(Supervisor::system(config, Arc::clone(settings)));

    let s = Arc::clone(&supervisor);
    let outcome = tokio::task::spawn_blocking(move || s.boot()).await?;
    println!("{}: {}", supervisor.config().service_name, outcome);

    Ok(supervisor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::mpsc;
    use std::sync::Mutex;
    use svcwarden_core::domain::{StartOutcome, StopOutcome};
    use svcwarden_core::ServiceSupervisorConfig;

    /// Lifecycle whose stop blocks until released.
    struct HeldStop {
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl ServiceLifecycle for HeldStop {
        fn start(&self, _config: &ServiceSupervisorConfig) -> StartOutcome {
            StartOutcome::Started
        }

        fn stop(&self, _config: &ServiceSupervisorConfig) -> StopOutcome {
            if let Ok(release) = self.release.lock() {
                let _ = release.recv();
            }
            StopOutcome::Stopped
        }
    }

    #[tokio::test]
    async fn test_busy_polls_answered_during_restart_stop() {
        let (release_tx, release_rx) = mpsc::channel();
        let lifecycle = Arc::new(HeldStop {
            release: Mutex::new(release_rx),
        });
        let settings = Arc::new(MemorySettings::new());
        let supervisor = Arc::new(Supervisor::new(
            lifecycle,
            settings,
            SupervisorConfig::for_service("agent"),
        ));

        let s = Arc::clone(&supervisor);
        let change = tokio::task::spawn_blocking(move || {
            s.on_configuration_changing(&HashSet::from(["ServerUrl".to_string()]))
        });

        let (_current, receiver) = watch::channel(supervisor);
        let (status_tx, mut status_rx) = tokio::sync::mpsc::unbounded_channel();
        let busy = tokio::spawn(poll_busy(receiver, Duration::from_millis(5), move |status| {
            let _ = status_tx.send(status);
        }));

        for _ in 0..3 {
            let status = tokio::time::timeout(Duration::from_secs(5), status_rx.recv())
                .await
                .unwrap();
            assert_eq!(status, Some(BusyStatus::Idle));
        }
        assert!(!change.is_finished());

        release_tx.send(()).unwrap();
        assert_eq!(change.await.unwrap(), ChangeDecision::Cancel);
        busy.abort();
    }
}
