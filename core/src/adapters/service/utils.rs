//! Parsers for service manager output.
//!
//! Kept platform-neutral so they are exercised on every platform.

use std::collections::HashMap;

use regex::Regex;

use crate::domain::{ServiceState, ServiceStatus};
use crate::error::{Error, Result};

/// Parse `systemctl show --property=LoadState,ActiveState,MainPID` output.
///
/// Expected format:
/// ```text
/// LoadState=loaded
/// ActiveState=active
/// MainPID=1234
/// ```
pub fn parse_systemctl_show(name: &str, output: &str) -> Result<ServiceStatus> {
    let props: HashMap<&str, &str> = output
        .lines()
        .filter_map(|line| line.trim().split_once('='))
        .collect();

    if matches!(props.get("LoadState"), Some(&"not-found")) {
        return Err(Error::ServiceUnavailable(format!("unit {} not found", name)));
    }

    let active = props
        .get("ActiveState")
        .ok_or_else(|| Error::ParseError(format!("no ActiveState for {}", name)))?;

    let state = match *active {
        "active" | "reloading" => ServiceState::Running,
        "inactive" | "failed" => ServiceState::Stopped,
        "activating" => ServiceState::StartPending,
        "deactivating" => ServiceState::StopPending,
        _ => ServiceState::Other,
    };

    let pid = props.get("MainPID").and_then(|p| p.parse::<u32>().ok());

    Ok(ServiceStatus::new(name, state, pid))
}

/// Parse `sc.exe queryex <name>` output.
///
/// Expected format:
/// ```text
/// SERVICE_NAME: agent
///         TYPE               : 10  WIN32_OWN_PROCESS
///         STATE              : 4  RUNNING
///                                 (STOPPABLE, NOT_PAUSABLE, ACCEPTS_SHUTDOWN)
///         WIN32_EXIT_CODE    : 0  (0x0)
///         PID                : 4321
/// ```
pub fn parse_sc_queryex(name: &str, output: &str) -> Result<ServiceStatus> {
    if let Some(err) = sc_failure(name, output) {
        return Err(err);
    }

    let state_re =
        Regex::new(r"STATE\s*:\s*(\d+)").map_err(|e| Error::ParseError(e.to_string()))?;
    let pid_re =
        Regex::new(r"PID\s*:\s*(\d+)").map_err(|e| Error::ParseError(e.to_string()))?;

    let code: u32 = state_re
        .captures(output)
        .and_then(|c| c[1].parse().ok())
        .ok_or_else(|| Error::ParseError(format!("no STATE for {}", name)))?;

    let state = match code {
        1 => ServiceState::Stopped,
        2 => ServiceState::StartPending,
        3 => ServiceState::StopPending,
        4 => ServiceState::Running,
        5 => ServiceState::ContinuePending,
        6 => ServiceState::PausePending,
        7 => ServiceState::Paused,
        _ => ServiceState::Other,
    };

    let pid = pid_re.captures(output).and_then(|c| c[1].parse::<u32>().ok());

    Ok(ServiceStatus::new(name, state, pid))
}

/// Map the output of a failed service command to an error.
pub fn classify_failure(name: &str, command: &str, output: &str) -> Error {
    if let Some(err) = sc_failure(name, output) {
        return err;
    }

    let lower = output.to_lowercase();
    if lower.contains("access denied")
        || lower.contains("access is denied")
        || lower.contains("authentication is required")
        || lower.contains("permission denied")
    {
        return Error::PermissionDenied(format!("{}: {}", command, output.trim()));
    }

    if lower.contains("not found")
        || lower.contains("not loaded")
        || lower.contains("does not exist")
    {
        return Error::ServiceUnavailable(format!("{}: {}", command, output.trim()));
    }

    Error::CommandFailed(format!("{} failed: {}", command, output.trim()))
}

/// Recognise `[SC] ... FAILED <code>:` lines for the codes that matter.
fn sc_failure(name: &str, output: &str) -> Option<Error> {
    let re = Regex::new(r"FAILED\s+(\d+)").ok()?;
    let code: u32 = re.captures(output)?[1].parse().ok()?;

    let err = match code {
        5 => Error::PermissionDenied(format!("access to service {} denied", name)),
        1060 => Error::ServiceUnavailable(format!("service {} does not exist", name)),
        _ => Error::CommandFailed(format!("sc.exe failed for {} with code {}", name, code)),
    };
    Some(err)
}
