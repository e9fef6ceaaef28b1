//! Busy command - one busy poll against the configured marker path.

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use svcwarden_core::{BusyCheckState, BusyReporter, BusyStatus, ConfigStore};

pub async fn run(store: &ConfigStore, json: bool) -> Result<()> {
    let config = store.load().await?;

    let state = Arc::new(BusyCheckState::new());
    state.store(config.settings.get(&config.busy_check_key).map(String::as_str));
    let path = state.load();

    let status = BusyReporter::new(state).on_busy_poll();

    if json {
        println!("{}", json!({ "status": status, "path": path }));
        return Ok(());
    }

    match (status, path) {
        (BusyStatus::Idle, None) => println!("idle (no busy check configured)"),
        (BusyStatus::Idle, Some(p)) => println!("idle ({} present)", p.display()),
        (BusyStatus::Busy, Some(p)) => println!("busy ({} missing)", p.display()),
        (BusyStatus::Busy, None) => println!("busy"),
    }
    Ok(())
}
