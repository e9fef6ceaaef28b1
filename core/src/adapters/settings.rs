//! In-memory settings source.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use crate::config::diff_settings;
use crate::ports::SettingsSource;

/// Settings held in memory and replaced by the host as its configuration changes.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) {
        self.values.write().remove(key);
    }

    /// Replace all values and return the keys that were added, removed or modified.
    pub fn replace(&self, values: HashMap<String, String>) -> HashSet<String> {
        let mut current = self.values.write();
        let changed = diff_settings(&current, &values);
        *current = values;
        changed
    }

    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values.read().clone()
    }
}

impl SettingsSource for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }
}
