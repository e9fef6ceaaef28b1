//! Process-tree termination against real processes.

#![cfg(unix)]

use std::process::Command;
use std::thread;
use std::time::Duration;

use svcwarden_core::ports::ProcessTablePort;
use svcwarden_core::{ProcessTerminator, SystemProcessTable};

#[test]
fn kills_shell_and_its_background_child() {
    let mut child = Command::new("sh")
        .args(["-c", "sleep 30 & sleep 30; wait"])
        .spawn()
        .unwrap();
    let root = child.id();

    // let the shell fork its background job
    thread::sleep(Duration::from_millis(300));

    let table = SystemProcessTable::new();
    let before = table.children_of(root).unwrap();
    assert!(!before.is_empty());

    let terminator = ProcessTerminator::new(table);
    let report = terminator.kill(root);

    let status = child.wait().unwrap();
    assert!(!status.success());
    assert!(report.terminated >= 2);
    assert_eq!(report.skipped_self, 0);
}

#[test]
fn dead_process_is_already_gone() {
    let mut child = Command::new("true").spawn().unwrap();
    let pid = child.id();
    child.wait().unwrap();

    let report = ProcessTerminator::new(SystemProcessTable::new()).kill(pid);

    assert_eq!(report.terminated, 0);
    assert_eq!(report.denied, 0);
}
