//! Settings source port (interface).

/// Port for reading host configuration values by key.
pub trait SettingsSource: Send + Sync {
    /// Current value for `key`, or `None` when unset.
    fn get(&self, key: &str) -> Option<String>;
}
