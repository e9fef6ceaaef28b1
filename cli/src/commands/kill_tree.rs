//! Kill-tree command - terminate a process and all its descendants.

use anyhow::Result;
use svcwarden_core::{ProcessTerminator, SystemProcessTable};

pub async fn run(pid: u32, json: bool) -> Result<()> {
    let report = tokio::task::spawn_blocking(move || {
        ProcessTerminator::new(SystemProcessTable::new()).kill(pid)
    })
    .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Process tree {}: {} terminated, {} already gone, {} refused",
        pid, report.terminated, report.already_gone, report.denied
    );
    if report.skipped_self > 0 {
        println!("Skipped own process");
    }
    Ok(())
}
