//! Linux service control through systemd.
//!
//! Uses the following commands:
//! - `systemctl show <unit> --property=LoadState,ActiveState,MainPID` to query
//! - `systemctl start --no-block <unit>` / `systemctl stop --no-block <unit>`
//!
//! Commands are issued without blocking; the controller does the waiting.

use std::process::{Command, Stdio};

use tracing::debug;

use crate::domain::ServiceStatus;
use crate::error::Result;

use super::utils::{classify_failure, parse_systemctl_show};
use super::Backend;

/// systemd-backed service manager.
pub struct SystemdManager;

impl SystemdManager {
    pub fn new() -> Self {
        Self
    }

    fn systemctl(&self, name: &str, args: &[&str]) -> Result<String> {
        debug!(service = name, args = ?args, "Executing systemctl");

        let output = Command::new("systemctl")
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(classify_failure(
            name,
            &format!("systemctl {}", args.join(" ")),
            &format!("{} {}", stdout, stderr),
        ))
    }
}

impl Backend for SystemdManager {
    fn query(&self, name: &str) -> Result<ServiceStatus> {
        let output = self.systemctl(
            name,
            &["show", name, "--property=LoadState,ActiveState,MainPID"],
        )?;
        parse_systemctl_show(name, &output)
    }

    fn start(&self, name: &str) -> Result<()> {
        self.systemctl(name, &["start", "--no-block", name])?;
        Ok(())
    }

    fn stop(&self, name: &str) -> Result<()> {
        self.systemctl(name, &["stop", "--no-block", name])?;
        Ok(())
    }
}
