//! Types exchanged with the hosting environment's callbacks.

use serde::{Deserialize, Serialize};

/// Default setting key holding the busy-check marker path.
pub const DEFAULT_BUSY_CHECK_KEY: &str = "BusyCheckPath";

/// Default setting keys that make up the server identity.
pub const DEFAULT_IDENTITY_KEYS: &[&str] = &["ServerUrl", "Role", "Environment"];

/// Answer to a configuration-changing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDecision {
    /// Let the host apply the change live.
    Proceed,
    /// Refuse the live change; the host restarts the whole unit instead.
    Cancel,
}

/// Answer to a busy poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusyStatus {
    Busy,
    Idle,
}

/// Setting keys the configuration watcher reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchedKeys {
    /// Key holding the busy-check marker path.
    pub busy_check_key: String,
    /// Keys whose change requires a full restart.
    pub identity_keys: Vec<String>,
}

impl WatchedKeys {
    pub fn new(busy_check_key: impl Into<String>, identity_keys: Vec<String>) -> Self {
        Self {
            busy_check_key: busy_check_key.into(),
            identity_keys,
        }
    }

    pub fn is_identity_key(&self, key: &str) -> bool {
        self.identity_keys.iter().any(|k| k == key)
    }
}

impl Default for WatchedKeys {
    fn default() -> Self {
        Self {
            busy_check_key: DEFAULT_BUSY_CHECK_KEY.to_string(),
            identity_keys: DEFAULT_IDENTITY_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_watched_keys() {
        let keys = WatchedKeys::default();
        assert_eq!(keys.busy_check_key, "BusyCheckPath");
        assert!(keys.is_identity_key("Role"));
        assert!(!keys.is_identity_key("BusyCheckPath"));
    }
}
