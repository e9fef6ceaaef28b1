//! Config commands - inspect and edit host settings.

use anyhow::Result;
use svcwarden_core::ConfigStore;

pub async fn show(store: &ConfigStore, json: bool) -> Result<()> {
    let config = store.load().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("Config file:        {}", store.path().display());
    println!("Service:            {}", config.service_name);
    println!("Start timeout:      {}s", config.start_timeout_secs);
    println!("Stop timeout:       {}s", config.stop_timeout_secs);
    println!("Restart timeout:    {}s", config.restart_stop_timeout_secs);
    println!("Terminate on fail:  {}", config.terminate_on_timeout);
    println!("Busy check key:     {}", config.busy_check_key);
    println!("Identity keys:      {}", config.identity_keys.join(", "));

    if config.settings.is_empty() {
        println!("\nNo settings.");
        return Ok(());
    }

    println!("\nSettings:");
    let mut keys: Vec<_> = config.settings.keys().collect();
    keys.sort();
    for key in keys {
        println!("  {} = {}", key, config.settings[key]);
    }
    Ok(())
}

pub async fn set(store: &ConfigStore, key: &str, value: &str) -> Result<()> {
    store.set_setting(key, value).await?;
    println!("Set {}", key);
    Ok(())
}

pub async fn unset(store: &ConfigStore, key: &str) -> Result<()> {
    if store.remove_setting(key).await? {
        println!("Removed {}", key);
    } else {
        println!("{} is not set", key);
    }
    Ok(())
}
