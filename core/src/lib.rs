//! svcwarden Core Library
//!
//! Lifecycle supervision for a single named OS service.
//! Provides functionality to:
//! - Start a service and wait for it to run, with a bounded timeout
//! - Stop a service gracefully and, on timeout, kill its whole process tree
//! - React to configuration changes (busy-check refresh or stop + restart)
//! - Report a busy signal from the presence of a marker file
//!
//! # Architecture
//! This library follows hexagonal architecture (ports & adapters):
//! - `domain`: Pure data models
//! - `ports`: Trait definitions (interfaces)
//! - `adapters`: External system implementations
//! - `application`: Supervision services
//! - `supervisor`: Host-facing facade wiring the services together
//!
//! # Platform Support
//! - Linux: `systemctl` for services, `ps` and signals for processes
//! - Windows: `sc.exe` for services, CIM queries and `taskkill` for processes
//! - Other Unix: process-tree termination only

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod supervisor;

// Re-export domain types (primary API)
pub use domain::{
    BusyStatus, ChangeDecision, KillReport, ProcessNode, ServiceState, ServiceStatus,
    ServiceSupervisorConfig, StartOutcome, StopOutcome, WatchedKeys,
};

// Re-export other commonly used types
pub use adapters::{MemorySettings, SystemProcessTable, SystemServiceManager};
pub use application::{
    BusyCheckState, BusyReporter, ConfigWatcher, ProcessTerminator, ServiceController,
};
pub use config::{ConfigStore, SupervisorConfig};
pub use error::{Error, KillError, Result};
pub use supervisor::{Supervisor, SystemSupervisor};
