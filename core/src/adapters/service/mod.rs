//! Service manager adapters.
//!
//! Platform-specific implementations of service control:
//! - Linux: `systemctl`
//! - Windows: `sc.exe`

#[cfg(target_os = "linux")]
mod systemd;

#[cfg(target_os = "windows")]
mod windows;

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
mod unsupported;

pub mod utils;

use crate::domain::ServiceStatus;
use crate::error::Result;
use crate::ports::ServiceManagerPort;

/// The service manager for the current platform.
pub struct SystemServiceManager {
    #[cfg(target_os = "linux")]
    inner: systemd::SystemdManager,

    #[cfg(target_os = "windows")]
    inner: windows::ScManager,

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    inner: unsupported::UnsupportedManager,
}

impl SystemServiceManager {
    /// Create a new service manager for the current platform.
    pub fn new() -> Self {
        Self {
            #[cfg(target_os = "linux")]
            inner: systemd::SystemdManager::new(),

            #[cfg(target_os = "windows")]
            inner: windows::ScManager::new(),

            #[cfg(not(any(target_os = "linux", target_os = "windows")))]
            inner: unsupported::UnsupportedManager,
        }
    }
}

impl Default for SystemServiceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceManagerPort for SystemServiceManager {
    fn query(&self, name: &str) -> Result<ServiceStatus> {
        self.inner.query(name)
    }

    fn start(&self, name: &str) -> Result<()> {
        self.inner.start(name)
    }

    fn stop(&self, name: &str) -> Result<()> {
        self.inner.stop(name)
    }
}

/// Internal trait for platform-specific implementations.
trait Backend: Send + Sync {
    fn query(&self, name: &str) -> Result<ServiceStatus>;
    fn start(&self, name: &str) -> Result<()>;
    fn stop(&self, name: &str) -> Result<()>;
}
