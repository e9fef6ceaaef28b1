//! Unix process table.
//!
//! Uses the following:
//! - Linux: `/proc/<pid>/stat` to list processes with their parents
//! - other Unix: `ps -Ao pid=,ppid=,comm=`
//! - `kill(pid, SIGKILL)` for termination

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tracing::debug;

use crate::domain::ProcessNode;
use crate::error::KillError;

use super::utils::children_in;

/// Unix process table backed by procfs or `ps`, and signals.
pub struct UnixProcessTable;

impl UnixProcessTable {
    pub fn new() -> Self {
        Self
    }

    pub fn children_of(&self, pid: u32) -> Result<Vec<ProcessNode>, KillError> {
        Ok(children_in(self.list()?, pid))
    }

    #[cfg(target_os = "linux")]
    fn list(&self) -> Result<Vec<ProcessNode>, KillError> {
        use super::utils::parse_proc_stat;

        let mut nodes = Vec::new();
        for entry in std::fs::read_dir("/proc")? {
            let Ok(entry) = entry else { continue };
            if !entry.file_name().to_string_lossy().bytes().all(|b| b.is_ascii_digit()) {
                continue;
            }

            // the process may exit between read_dir and this read
            let Ok(stat) = std::fs::read_to_string(entry.path().join("stat")) else {
                continue;
            };
            if let Some(node) = parse_proc_stat(&stat) {
                nodes.push(node);
            }
        }
        Ok(nodes)
    }

    #[cfg(not(target_os = "linux"))]
    fn list(&self) -> Result<Vec<ProcessNode>, KillError> {
        use std::process::{Command, Stdio};

        use super::utils::parse_process_listing;

        let output = Command::new("ps")
            .args(["-Ao", "pid=,ppid=,comm="])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()?;

        if !output.status.success() {
            return Err(KillError::CommandFailed(format!(
                "ps exited with {}",
                output.status
            )));
        }

        Ok(parse_process_listing(&String::from_utf8_lossy(&output.stdout)))
    }

    pub fn terminate(&self, pid: u32) -> Result<(), KillError> {
        let raw = i32::try_from(pid)
            .ok()
            .filter(|p| *p > 0)
            .ok_or(KillError::ProcessNotFound(pid))?;

        debug!(pid = pid, "Sending SIGKILL");

        match kill(Pid::from_raw(raw), Signal::SIGKILL) {
            Ok(()) => Ok(()),
            Err(Errno::ESRCH) => Err(KillError::ProcessNotFound(pid)),
            Err(Errno::EPERM) => Err(KillError::PermissionDenied(pid)),
            Err(e) => Err(KillError::TerminationFailed(pid, e.to_string())),
        }
    }
}
