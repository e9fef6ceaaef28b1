//! Start, stop and status commands.

use std::time::Duration;

use anyhow::Result;
use serde_json::json;

use super::controller;
use svcwarden_core::{ConfigStore, ServiceSupervisorConfig, SupervisorConfig};

pub async fn start(store: &ConfigStore, timeout: Option<u64>, json: bool) -> Result<()> {
    let config = store.load().await?;
    let name = config.require_service_name()?.to_string();

    let mut call = config.start_config();
    if let Some(secs) = timeout {
        call = call.with_timeout(Duration::from_secs(secs));
    }

    let outcome = tokio::task::spawn_blocking(move || controller().start(&call)).await?;

    if json {
        println!("{}", json!({ "service": name, "outcome": outcome }));
    } else {
        println!("{}: {}", name, outcome);
    }
    Ok(())
}

pub async fn stop(
    store: &ConfigStore,
    timeout: Option<u64>,
    terminate: Option<bool>,
    json: bool,
) -> Result<()> {
    let config = store.load().await?;
    let name = config.require_service_name()?.to_string();

    let mut call = stop_call(&config, terminate);
    if let Some(secs) = timeout {
        call = call.with_timeout(Duration::from_secs(secs));
    }

    let outcome = tokio::task::spawn_blocking(move || controller().stop(&call)).await?;

    if json {
        println!("{}", json!({ "service": name, "outcome": outcome }));
    } else {
        println!("{}: {}", name, outcome);
    }
    Ok(())
}

/// Stop parameters from the configuration; `terminate` overrides the
/// configured terminate-on-timeout policy in either direction.
fn stop_call(config: &SupervisorConfig, terminate: Option<bool>) -> ServiceSupervisorConfig {
    config
        .stop_config()
        .with_terminate_on_timeout(terminate.unwrap_or(config.terminate_on_timeout))
}

pub async fn status(store: &ConfigStore, json: bool) -> Result<()> {
    let config = store.load().await?;
    let name = config.require_service_name()?.to_string();

    let status = tokio::task::spawn_blocking(move || controller().status(&name)).await??;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    match status.pid {
        Some(pid) => println!("{}: {} (pid {})", status.name, status.state, pid),
        None => println!("{}: {}", status.name, status.state),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_call_follows_configured_policy() {
        let mut config = SupervisorConfig::for_service("agent");
        config.terminate_on_timeout = true;

        assert!(stop_call(&config, None).terminate_on_timeout);
        assert!(!stop_call(&config, Some(false)).terminate_on_timeout);

        config.terminate_on_timeout = false;
        assert!(!stop_call(&config, None).terminate_on_timeout);
        assert!(stop_call(&config, Some(true)).terminate_on_timeout);
    }
}
