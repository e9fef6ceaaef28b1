//! Domain layer - Pure data models.
//!
//! This module contains the types that describe services, processes and host
//! callbacks. These types have no I/O dependencies and can be tested in isolation.

mod host;
mod process;
mod service;

// Re-export all domain types
pub use host::{
    BusyStatus, ChangeDecision, WatchedKeys, DEFAULT_BUSY_CHECK_KEY, DEFAULT_IDENTITY_KEYS,
};
pub use process::{KillReport, ProcessNode};
pub use service::{
    ServiceState, ServiceStatus, ServiceSupervisorConfig, StartOutcome, StopOutcome,
    DEFAULT_POLL_INTERVAL, DEFAULT_START_TIMEOUT, DEFAULT_STOP_TIMEOUT,
};
