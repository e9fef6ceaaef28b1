//! Recursive process-tree termination.
//!
//! The walk is depth-first post-order over a live process table: children of
//! a node are enumerated with a fresh query, each child's subtree is killed
//! before the child itself, and the root goes last. Every enumeration is a
//! momentary snapshot, so any target may vanish before its turn; a vanished
//! target counts as success.
//!
//! A process that spawns children after its parent level was enumerated can
//! be missed. No global snapshot is taken because the OS process table cannot
//! be locked anyway.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::domain::{KillReport, ProcessNode};
use crate::error::KillError;
use crate::ports::ProcessTablePort;

/// Kills a process and every process it transitively spawned.
pub struct ProcessTerminator<P: ProcessTablePort> {
    table: P,
    own_pid: u32,
}

impl<P: ProcessTablePort> ProcessTerminator<P> {
    /// Create a terminator that protects the current process.
    pub fn new(table: P) -> Self {
        Self {
            table,
            own_pid: std::process::id(),
        }
    }

    /// Create a terminator that treats `own_pid` as the caller's process.
    pub fn with_own_pid(table: P, own_pid: u32) -> Self {
        Self { table, own_pid }
    }

    /// Access the underlying process table.
    pub fn table(&self) -> &P {
        &self.table
    }

    /// Kill `root_pid` and all of its live descendants, deepest first.
    ///
    /// Best-effort: failures are logged and counted, never returned.
    pub fn kill(&self, root_pid: u32) -> KillReport {
        info!(pid = root_pid, "Killing process tree");

        let mut report = KillReport::default();
        let mut visited = HashSet::new();
        visited.insert(root_pid);

        self.kill_descendants(root_pid, &mut visited, &mut report);
        self.kill_one(root_pid, None, &mut report);

        info!(
            pid = root_pid,
            terminated = report.terminated,
            already_gone = report.already_gone,
            denied = report.denied,
            "Process tree kill pass finished"
        );
        report
    }

    fn kill_descendants(
        &self,
        parent_pid: u32,
        visited: &mut HashSet<u32>,
        report: &mut KillReport,
    ) {
        debug!(pid = parent_pid, "Finding processes spawned by process");

        let children = match self.table.children_of(parent_pid) {
            Ok(children) => children,
            Err(e) => {
                warn!(pid = parent_pid, error = %e, "Failed to enumerate child processes");
                return;
            }
        };

        if children.is_empty() {
            return;
        }

        info!(
            pid = parent_pid,
            count = children.len(),
            "Killing processes spawned by process"
        );

        for child in children {
            // pid reuse can make the parentage graph cyclic
            if child.pid == parent_pid || !visited.insert(child.pid) {
                debug!(pid = child.pid, parent = parent_pid, "Skipping already visited process");
                continue;
            }

            self.kill_descendants(child.pid, visited, report);
            self.kill_one(child.pid, Some(&child), report);
        }
    }

    fn kill_one(&self, pid: u32, node: Option<&ProcessNode>, report: &mut KillReport) {
        if pid == self.own_pid {
            debug!(pid = pid, "Refusing to kill own process");
            report.skipped_self += 1;
            return;
        }

        // pid 0 addresses the whole process group on Unix and the idle process on Windows
        if pid == 0 {
            debug!("Refusing to kill pid 0");
            return;
        }

        let name = node.map(|n| n.name.as_str()).unwrap_or("");
        info!(pid = pid, name = name, "Killing process");

        match self.table.terminate(pid) {
            Ok(()) => report.terminated += 1,
            Err(KillError::ProcessNotFound(_)) => {
                info!(pid = pid, "Process not found, already exited");
                report.already_gone += 1;
            }
            Err(e) => {
                warn!(pid = pid, error = %e, "Failed to kill process");
                report.denied += 1;
            }
        }
    }
}
