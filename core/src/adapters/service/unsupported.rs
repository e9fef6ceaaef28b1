//! Service manager stub for platforms without systemd or the Windows SCM.

use crate::domain::ServiceStatus;
use crate::error::{Error, Result};

use super::Backend;

/// Placeholder for platforms without a supported service manager.
pub struct UnsupportedManager;

impl Backend for UnsupportedManager {
    fn query(&self, _name: &str) -> Result<ServiceStatus> {
        Err(unsupported())
    }

    fn start(&self, _name: &str) -> Result<()> {
        Err(unsupported())
    }

    fn stop(&self, _name: &str) -> Result<()> {
        Err(unsupported())
    }
}

fn unsupported() -> Error {
    Error::UnsupportedPlatform(std::env::consts::OS.to_string())
}
