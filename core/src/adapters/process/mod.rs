//! Process table adapters.
//!
//! Platform-specific implementations of process enumeration and termination:
//! - Unix: `ps` for parentage, `SIGKILL` via `nix`
//! - Windows: CIM `Win32_Process` for parentage, `taskkill /F`

#[cfg(unix)]
mod unix;

#[cfg(windows)]
mod windows;

pub mod utils;

use crate::domain::ProcessNode;
use crate::error::KillError;
use crate::ports::ProcessTablePort;

/// The process table for the current platform.
pub struct SystemProcessTable {
    #[cfg(unix)]
    inner: unix::UnixProcessTable,

    #[cfg(windows)]
    inner: windows::WindowsProcessTable,
}

impl SystemProcessTable {
    /// Create a new process table for the current platform.
    pub fn new() -> Self {
        Self {
            #[cfg(unix)]
            inner: unix::UnixProcessTable::new(),

            #[cfg(windows)]
            inner: windows::WindowsProcessTable::new(),
        }
    }
}

impl Default for SystemProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTablePort for SystemProcessTable {
    fn children_of(&self, pid: u32) -> Result<Vec<ProcessNode>, KillError> {
        self.inner.children_of(pid)
    }

    fn terminate(&self, pid: u32) -> Result<(), KillError> {
        self.inner.terminate(pid)
    }
}

// Fallback for unsupported platforms (compile-time check)
#[cfg(not(any(unix, windows)))]
compile_error!("Unsupported platform: only Unix and Windows are supported");
