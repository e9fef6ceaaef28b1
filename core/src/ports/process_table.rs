//! Process table port (interface).

use crate::domain::ProcessNode;
use crate::error::KillError;

/// Port for enumerating and terminating OS processes.
///
/// Every call is a fresh point-in-time view of the process table.
pub trait ProcessTablePort: Send + Sync {
    /// List the live processes whose parent is `pid`.
    fn children_of(&self, pid: u32) -> Result<Vec<ProcessNode>, KillError>;

    /// Forcefully terminate a single process.
    ///
    /// Returns `KillError::ProcessNotFound` when `pid` no longer resolves to a
    /// live process.
    fn terminate(&self, pid: u32) -> Result<(), KillError>;
}
