//! Windows process table.
//!
//! Uses the following system commands:
//! - `Get-CimInstance Win32_Process -Filter "ParentProcessId=N"` to list children
//! - `taskkill /PID xxx /F` for forced termination

use std::process::{Command, Stdio};

use tracing::debug;

use crate::domain::ProcessNode;
use crate::error::KillError;

use super::utils::{children_in, classify_taskkill_output, parse_process_listing};

/// Windows process table backed by CIM queries and taskkill.
pub struct WindowsProcessTable;

impl WindowsProcessTable {
    pub fn new() -> Self {
        Self
    }

    pub fn children_of(&self, pid: u32) -> Result<Vec<ProcessNode>, KillError> {
        let script = format!(
            "Get-CimInstance Win32_Process -Filter \"ParentProcessId={}\" | \
             ForEach-Object {{ \"$($_.ProcessId) $($_.ParentProcessId) $($_.Name)\" }}",
            pid
        );

        let output = Command::new("powershell")
            .args(["-NoProfile", "-NonInteractive", "-Command", &script])
            .stdin(Stdio::null())
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KillError::CommandFailed(format!(
                "Win32_Process query failed: {}",
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(children_in(parse_process_listing(&stdout), pid))
    }

    pub fn terminate(&self, pid: u32) -> Result<(), KillError> {
        debug!(pid = pid, "Executing taskkill /F");

        let output = Command::new("taskkill")
            .args(["/PID", &pid.to_string(), "/F"])
            .stdin(Stdio::null())
            .output()?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        classify_taskkill_output(pid, &format!("{} {}", stdout, stderr))
    }
}
