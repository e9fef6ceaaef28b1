//! Windows service control through the Service Control Manager.
//!
//! Uses the following commands:
//! - `sc.exe queryex <name>` to read the state and process id
//! - `sc.exe start <name>` / `sc.exe stop <name>`
//!
//! `sc.exe` reports failures on stdout as `[SC] ... FAILED <code>:`.

use std::process::{Command, Stdio};

use tracing::debug;

use crate::domain::ServiceStatus;
use crate::error::Result;

use super::utils::{classify_failure, parse_sc_queryex};
use super::Backend;

/// SCM-backed service manager.
pub struct ScManager;

impl ScManager {
    pub fn new() -> Self {
        Self
    }

    fn sc(&self, name: &str, verb: &str) -> Result<String> {
        debug!(service = name, verb = verb, "Executing sc.exe");

        let output = Command::new("sc.exe")
            .args([verb, name])
            .stdin(Stdio::null())
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(classify_failure(
            name,
            &format!("sc.exe {} {}", verb, name),
            &format!("{} {}", stdout, stderr),
        ))
    }
}

impl Backend for ScManager {
    fn query(&self, name: &str) -> Result<ServiceStatus> {
        let output = self.sc(name, "queryex")?;
        parse_sc_queryex(name, &output)
    }

    fn start(&self, name: &str) -> Result<()> {
        self.sc(name, "start")?;
        Ok(())
    }

    fn stop(&self, name: &str) -> Result<()> {
        self.sc(name, "stop")?;
        Ok(())
    }
}
