//! End-to-end supervisor behaviour over simulated service and process tables.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use svcwarden_core::ports::{ProcessTablePort, ServiceManagerPort};
use svcwarden_core::{
    BusyStatus, ChangeDecision, KillError, MemorySettings, ProcessNode, ProcessTerminator,
    Result, ServiceController, ServiceState, ServiceStatus, StartOutcome, StopOutcome,
    Supervisor, SupervisorConfig,
};

const SERVICE_PID: u32 = 100;

/// A service that starts instantly and either stops or hangs in StopPending.
struct SimulatedService {
    status: Mutex<ServiceStatus>,
    hangs_on_stop: bool,
    starts: Mutex<usize>,
    stops: Mutex<usize>,
}

impl SimulatedService {
    fn new(state: ServiceState, hangs_on_stop: bool) -> Self {
        let pid = (state != ServiceState::Stopped).then_some(SERVICE_PID);
        Self {
            status: Mutex::new(ServiceStatus::new("agent", state, pid)),
            hangs_on_stop,
            starts: Mutex::new(0),
            stops: Mutex::new(0),
        }
    }
}

impl ServiceManagerPort for SimulatedService {
    fn query(&self, _name: &str) -> Result<ServiceStatus> {
        Ok(self.status.lock().clone())
    }

    fn start(&self, name: &str) -> Result<()> {
        *self.starts.lock() += 1;
        *self.status.lock() = ServiceStatus::new(name, ServiceState::Running, Some(SERVICE_PID));
        Ok(())
    }

    fn stop(&self, name: &str) -> Result<()> {
        *self.stops.lock() += 1;
        let next = if self.hangs_on_stop {
            ServiceStatus::new(name, ServiceState::StopPending, Some(SERVICE_PID))
        } else {
            ServiceStatus::new(name, ServiceState::Stopped, None)
        };
        *self.status.lock() = next;
        Ok(())
    }
}

/// Process table with a fixed tree below the service process.
struct SimulatedProcesses {
    children: HashMap<u32, Vec<u32>>,
    alive: Mutex<HashSet<u32>>,
    killed: Mutex<Vec<u32>>,
}

impl SimulatedProcesses {
    fn service_tree() -> Self {
        // service -> worker -> helper, service -> logger
        let mut children = HashMap::new();
        children.insert(SERVICE_PID, vec![200, 300]);
        children.insert(200, vec![210]);

        Self {
            children,
            alive: Mutex::new([SERVICE_PID, 200, 210, 300].into_iter().collect()),
            killed: Mutex::new(Vec::new()),
        }
    }
}

impl ProcessTablePort for SimulatedProcesses {
    fn children_of(&self, pid: u32) -> std::result::Result<Vec<ProcessNode>, KillError> {
        let alive = self.alive.lock();
        Ok(self
            .children
            .get(&pid)
            .map(|c| {
                c.iter()
                    .filter(|p| alive.contains(*p))
                    .map(|p| ProcessNode::new(*p, pid, "sim"))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn terminate(&self, pid: u32) -> std::result::Result<(), KillError> {
        if !self.alive.lock().remove(&pid) {
            return Err(KillError::ProcessNotFound(pid));
        }
        self.killed.lock().push(pid);
        Ok(())
    }
}

type SimController = ServiceController<SimulatedService, SimulatedProcesses>;

fn supervisor(
    service: SimulatedService,
    settings: Arc<MemorySettings>,
) -> Supervisor<SimController, MemorySettings> {
    let mut config = SupervisorConfig::for_service("agent");
    config.start_timeout_secs = 1;
    config.stop_timeout_secs = 0;
    config.restart_stop_timeout_secs = 0;
    config.poll_interval_ms = 1;

    let controller = ServiceController::new(
        service,
        ProcessTerminator::with_own_pid(SimulatedProcesses::service_tree(), 1),
    );
    Supervisor::new(Arc::new(controller), settings, config)
}

fn killed(s: &Supervisor<SimController, MemorySettings>) -> Vec<u32> {
    s.lifecycle().terminator().table().killed.lock().clone()
}

fn keys(keys: &[&str]) -> HashSet<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

#[test]
fn boot_starts_service_and_loads_busy_path() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("ready");

    let settings = Arc::new(MemorySettings::new());
    settings.set("BusyCheckPath", marker.to_string_lossy());

    let s = supervisor(SimulatedService::new(ServiceState::Stopped, false), settings);

    assert_eq!(s.on_busy_poll(), BusyStatus::Idle);
    assert_eq!(s.boot(), StartOutcome::Started);
    assert_eq!(s.on_busy_poll(), BusyStatus::Busy);

    std::fs::write(&marker, "").unwrap();
    assert_eq!(s.on_busy_poll(), BusyStatus::Idle);
}

#[test]
fn boot_on_running_service_is_noop() {
    let s = supervisor(
        SimulatedService::new(ServiceState::Running, false),
        Arc::new(MemorySettings::new()),
    );

    assert_eq!(s.boot(), StartOutcome::AlreadyRunning);
    assert_eq!(*s.lifecycle().manager().starts.lock(), 0);
}

#[test]
fn identity_change_kills_hung_service_tree_and_cancels() {
    let settings = Arc::new(MemorySettings::new());
    let s = supervisor(SimulatedService::new(ServiceState::Running, true), Arc::clone(&settings));

    let decision = s.on_configuration_changing(&keys(&["ServerUrl", "BusyCheckPath"]));

    assert_eq!(decision, ChangeDecision::Cancel);
    assert_eq!(*s.lifecycle().manager().stops.lock(), 1);
    assert_eq!(killed(&s), vec![210, 200, 300, SERVICE_PID]);
}

#[test]
fn unrelated_change_does_nothing() {
    let s = supervisor(
        SimulatedService::new(ServiceState::Running, true),
        Arc::new(MemorySettings::new()),
    );

    let decision = s.on_configuration_changing(&keys(&["LogLevel"]));

    assert_eq!(decision, ChangeDecision::Proceed);
    assert_eq!(*s.lifecycle().manager().stops.lock(), 0);
    assert!(killed(&s).is_empty());
}

#[test]
fn shutdown_without_terminate_leaves_hung_service() {
    let s = supervisor(
        SimulatedService::new(ServiceState::Running, true),
        Arc::new(MemorySettings::new()),
    );

    assert_eq!(s.shutdown(), StopOutcome::TimedOut);
    assert!(killed(&s).is_empty());

    assert_eq!(s.shutdown_with(true), StopOutcome::TerminatedForcefully);
    assert_eq!(killed(&s).len(), 4);
}

#[test]
fn shutdown_of_stopped_service_is_noop() {
    let s = supervisor(
        SimulatedService::new(ServiceState::Stopped, true),
        Arc::new(MemorySettings::new()),
    );

    assert_eq!(s.shutdown_with(true), StopOutcome::AlreadyStopped);
    assert_eq!(*s.lifecycle().manager().stops.lock(), 0);
    assert!(killed(&s).is_empty());
}

#[test]
fn graceful_shutdown_never_kills() {
    let s = supervisor(
        SimulatedService::new(ServiceState::Running, false),
        Arc::new(MemorySettings::new()),
    );

    assert_eq!(s.shutdown_with(true), StopOutcome::Stopped);
    assert!(killed(&s).is_empty());
}

#[test]
fn busy_polls_run_alongside_configuration_changes() {
    let settings = Arc::new(MemorySettings::new());
    let s = Arc::new(supervisor(
        SimulatedService::new(ServiceState::Running, false),
        Arc::clone(&settings),
    ));

    let poller = {
        let s = Arc::clone(&s);
        std::thread::spawn(move || {
            for _ in 0..200 {
                let _ = s.on_busy_poll();
            }
        })
    };

    for i in 0..50 {
        settings.set("BusyCheckPath", format!("/nonexistent/marker-{}", i));
        assert_eq!(
            s.on_configuration_changing(&keys(&["BusyCheckPath"])),
            ChangeDecision::Proceed
        );
    }

    poller.join().unwrap();
    assert_eq!(s.on_busy_poll(), BusyStatus::Busy);
}
