//! Application layer - Supervision services.
//!
//! This module contains the components that orchestrate domain logic and
//! adapter interactions:
//! - `ProcessTerminator`: recursive process-tree kill
//! - `ServiceController`: bounded-wait start/stop state machine
//! - `ConfigWatcher`: configuration-change handling
//! - `BusyReporter`: marker-file busy signal
//!
//! Services depend only on the traits in `ports`, so any implementation can
//! be injected.

mod busy;
mod controller;
mod terminator;
mod watcher;

pub use busy::{BusyCheckState, BusyReporter};
pub use controller::ServiceController;
pub use terminator::ProcessTerminator;
pub use watcher::ConfigWatcher;
