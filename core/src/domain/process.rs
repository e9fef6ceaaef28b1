//! Process tree domain model.

use serde::{Deserialize, Serialize};

/// A live OS process as seen by one enumeration.
///
/// Never cached: process ids are reused by the OS.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessNode {
    pub pid: u32,
    pub parent_pid: u32,
    /// Executable name, for diagnostics only.
    pub name: String,
}

impl ProcessNode {
    pub fn new(pid: u32, parent_pid: u32, name: impl Into<String>) -> Self {
        Self {
            pid,
            parent_pid,
            name: name.into(),
        }
    }
}

/// Summary of one kill pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillReport {
    /// Processes that were terminated by this pass.
    pub terminated: usize,
    /// Targets that had already exited when their turn came.
    pub already_gone: usize,
    /// Targets the OS refused to terminate, or whose termination failed.
    pub denied: usize,
    /// Times the caller's own process was found in the tree and spared.
    pub skipped_self: usize,
}

impl KillReport {
    /// Total number of kill decisions made in this pass.
    pub fn attempted(&self) -> usize {
        self.terminated + self.already_gone + self.denied
    }
}
