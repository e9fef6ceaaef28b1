//! Parsers for process listings and kill command output.
//!
//! Kept platform-neutral so they are exercised on every platform.

use crate::domain::ProcessNode;
use crate::error::KillError;

/// Parse `<pid> <ppid> <name>` lines. Names may contain spaces.
///
/// Lines that do not start with two numbers are skipped.
pub fn parse_process_listing(output: &str) -> Vec<ProcessNode> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let pid: u32 = parts.next()?.parse().ok()?;
            let parent_pid: u32 = parts.next()?.parse().ok()?;
            let name = parts.collect::<Vec<_>>().join(" ");
            Some(ProcessNode::new(pid, parent_pid, name))
        })
        .collect()
}

/// Parse the contents of `/proc/<pid>/stat`.
///
/// Format: `pid (comm) state ppid ...`. `comm` may itself contain spaces and
/// parentheses, so it runs up to the last `)`.
pub fn parse_proc_stat(stat: &str) -> Option<ProcessNode> {
    let open = stat.find('(')?;
    let close = stat.rfind(')')?;
    if close < open {
        return None;
    }

    let pid: u32 = stat[..open].trim().parse().ok()?;
    let name = &stat[open + 1..close];

    let mut rest = stat[close + 1..].split_whitespace();
    let _state = rest.next()?;
    let parent_pid: u32 = rest.next()?.parse().ok()?;

    Some(ProcessNode::new(pid, parent_pid, name))
}

/// Keep only the direct children of `parent_pid`.
pub fn children_in(nodes: Vec<ProcessNode>, parent_pid: u32) -> Vec<ProcessNode> {
    nodes
        .into_iter()
        .filter(|n| n.parent_pid == parent_pid && n.pid != parent_pid)
        .collect()
}

/// Map a failed `taskkill` run to a result.
///
/// "already been terminated" counts as success.
pub fn classify_taskkill_output(pid: u32, combined: &str) -> Result<(), KillError> {
    if combined.contains("already been terminated") || combined.contains("has exited") {
        return Ok(());
    }

    if combined.contains("not found") || combined.contains("could not be found") {
        return Err(KillError::ProcessNotFound(pid));
    }

    if combined.contains("Access is denied") || combined.contains("access denied") {
        return Err(KillError::PermissionDenied(pid));
    }

    Err(KillError::CommandFailed(format!(
        "taskkill /PID {} /F failed: {}",
        pid,
        combined.trim()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ps_listing() {
        let output =
            "    1     0 systemd\n  412     1 sshd\n  900   412 Web Content\ngarbage line\n";
        let nodes = parse_process_listing(output);

        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[2], ProcessNode::new(900, 412, "Web Content"));
    }

    #[test]
    fn test_parse_proc_stat() {
        let node = parse_proc_stat("4242 (my (odd) proc) S 17 4242 4242 0 -1 4194560 ...").unwrap();
        assert_eq!(node, ProcessNode::new(4242, 17, "my (odd) proc"));

        assert!(parse_proc_stat("garbage").is_none());
    }

    #[test]
    fn test_children_in() {
        let nodes =
            parse_process_listing("0 0 idle\n4 0 System\n500 4 smss.exe\n600 4 csrss.exe\n");

        let children: Vec<u32> = children_in(nodes.clone(), 4).iter().map(|n| n.pid).collect();
        assert_eq!(children, vec![500, 600]);

        let children: Vec<u32> = children_in(nodes, 0).iter().map(|n| n.pid).collect();
        assert_eq!(children, vec![4]);
    }

    #[test]
    fn test_classify_taskkill() {
        assert!(classify_taskkill_output(1, "ERROR: The process \"1\" not found.").is_err());
        assert!(matches!(
            classify_taskkill_output(
                2,
                "ERROR: The process with PID 2 could not be terminated.\nReason: Access is denied."
            ),
            Err(KillError::PermissionDenied(2))
        ));
        assert!(matches!(
            classify_taskkill_output(3, "ERROR: The process \"3\" not found."),
            Err(KillError::ProcessNotFound(3))
        ));
        assert!(classify_taskkill_output(4, "The process has already been terminated").is_ok());
    }
}
