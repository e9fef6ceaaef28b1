//! Supervisor configuration.
//!
//! Stored in JSON format at `~/.svcwarden/config.json`. The file carries both
//! the supervisor's own knobs and the host settings (`settings`) that the
//! configuration watcher reacts to.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::{
    ServiceSupervisorConfig, WatchedKeys, DEFAULT_BUSY_CHECK_KEY, DEFAULT_IDENTITY_KEYS,
};
use crate::error::{Error, Result};

/// Configuration data stored in JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorConfig {
    /// Name of the supervised service.
    #[serde(default)]
    pub service_name: String,

    /// Seconds to wait for the service to start.
    #[serde(default = "default_start_timeout")]
    pub start_timeout_secs: u64,

    /// Seconds to wait for the service to stop at shutdown.
    #[serde(default = "default_stop_timeout")]
    pub stop_timeout_secs: u64,

    /// Seconds to wait for the service to stop before a configuration-triggered restart.
    #[serde(default = "default_restart_stop_timeout")]
    pub restart_stop_timeout_secs: u64,

    /// Kill the service's process tree when a shutdown stop times out.
    #[serde(default)]
    pub terminate_on_timeout: bool,

    /// Milliseconds between status queries while waiting.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Setting key holding the busy-check marker path.
    #[serde(default = "default_busy_check_key")]
    pub busy_check_key: String,

    /// Setting keys that make up the server identity.
    #[serde(default = "default_identity_keys")]
    pub identity_keys: Vec<String>,

    /// Host settings, by key.
    #[serde(default)]
    pub settings: HashMap<String, String>,
}

fn default_start_timeout() -> u64 {
    30
}

fn default_stop_timeout() -> u64 {
    60
}

fn default_restart_stop_timeout() -> u64 {
    30
}

fn default_poll_interval() -> u64 {
    250
}

fn default_busy_check_key() -> String {
    DEFAULT_BUSY_CHECK_KEY.to_string()
}

fn default_identity_keys() -> Vec<String> {
    DEFAULT_IDENTITY_KEYS.iter().map(|k| k.to_string()).collect()
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            service_name: String::new(),
            start_timeout_secs: default_start_timeout(),
            stop_timeout_secs: default_stop_timeout(),
            restart_stop_timeout_secs: default_restart_stop_timeout(),
            terminate_on_timeout: false,
            poll_interval_ms: default_poll_interval(),
            busy_check_key: default_busy_check_key(),
            identity_keys: default_identity_keys(),
            settings: HashMap::new(),
        }
    }
}

impl SupervisorConfig {
    /// Create a configuration for the named service with default timeouts.
    pub fn for_service(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Self::default()
        }
    }

    /// Service name, or an error when none is configured.
    pub fn require_service_name(&self) -> Result<&str> {
        let name = self.service_name.trim();
        if name.is_empty() {
            return Err(Error::Config("serviceName is not set".to_string()));
        }
        Ok(name)
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Per-call configuration for starting the service.
    pub fn start_config(&self) -> ServiceSupervisorConfig {
        ServiceSupervisorConfig::for_start(self.service_name.trim())
            .with_timeout(Duration::from_secs(self.start_timeout_secs))
            .with_poll_interval(self.poll_interval())
    }

    /// Per-call configuration for stopping the service at shutdown.
    pub fn stop_config(&self) -> ServiceSupervisorConfig {
        ServiceSupervisorConfig::for_stop(self.service_name.trim())
            .with_timeout(Duration::from_secs(self.stop_timeout_secs))
            .with_terminate_on_timeout(self.terminate_on_timeout)
            .with_poll_interval(self.poll_interval())
    }

    /// Per-call configuration for the stop preceding a configuration-triggered restart.
    pub fn restart_stop_config(&self) -> ServiceSupervisorConfig {
        ServiceSupervisorConfig::for_stop(self.service_name.trim())
            .with_timeout(Duration::from_secs(self.restart_stop_timeout_secs))
            .with_terminate_on_timeout(true)
            .with_poll_interval(self.poll_interval())
    }

    /// Keys the configuration watcher reacts to.
    pub fn watched_keys(&self) -> WatchedKeys {
        WatchedKeys::new(self.busy_check_key.clone(), self.identity_keys.clone())
    }
}

/// Keys that were added, removed or modified between two settings maps.
pub fn diff_settings(
    old: &HashMap<String, String>,
    new: &HashMap<String, String>,
) -> HashSet<String> {
    let mut changed: HashSet<String> = old
        .iter()
        .filter(|(k, v)| new.get(*k) != Some(*v))
        .map(|(k, _)| k.clone())
        .collect();

    changed.extend(
        new.keys()
            .filter(|k| !old.contains_key(*k))
            .cloned(),
    );

    changed
}

/// Configuration store for the supervisor.
///
/// Handles reading and writing configuration to `~/.svcwarden/config.json`.
pub struct ConfigStore {
    /// Path to the configuration file.
    config_path: PathBuf,
}

impl ConfigStore {
    /// Create a new config store with the default path.
    ///
    /// Default path: `~/.svcwarden/config.json`
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

        let config_path = home.join(".svcwarden").join("config.json");

        Ok(Self { config_path })
    }

    /// Create a config store with a custom path.
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Get the configuration file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> PathBuf {
        self.config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Load configuration from disk.
    ///
    /// Returns default config if the file doesn't exist.
    pub async fn load(&self) -> Result<SupervisorConfig> {
        if !self.config_path.exists() {
            return Ok(SupervisorConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub async fn save(&self, config: &SupervisorConfig) -> Result<()> {
        let config_dir = self.config_dir();
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .await
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        // Write atomically by writing to temp file then renaming
        let temp_path = self.config_path.with_extension("json.tmp");

        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to create temp config file: {}", e)))?;

        file.write_all(content.as_bytes())
            .await
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;

        file.sync_all()
            .await
            .map_err(|e| Error::Config(format!("Failed to sync config: {}", e)))?;

        fs::rename(&temp_path, &self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to rename config file: {}", e)))?;

        Ok(())
    }

    /// Set a host setting.
    pub async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.load().await?;
        config.settings.insert(key.to_string(), value.to_string());
        self.save(&config).await
    }

    /// Remove a host setting. Returns false if it was not set.
    pub async fn remove_setting(&self, key: &str) -> Result<bool> {
        let mut config = self.load().await?;
        if config.settings.remove(key).is_none() {
            return Ok(false);
        }
        self.save(&config).await?;
        Ok(true)
    }
}
