//! Subcommand implementations.

pub mod busy;
pub mod config;
pub mod kill_tree;
pub mod lifecycle;
pub mod run;

use std::path::PathBuf;

use anyhow::Result;
use svcwarden_core::{
    ConfigStore, ProcessTerminator, ServiceController, SystemProcessTable, SystemServiceManager,
};

/// Controller over the platform adapters.
pub type SystemController = ServiceController<SystemServiceManager, SystemProcessTable>;

/// Open the config store at `path`, or at the default location.
pub fn store(path: Option<PathBuf>) -> Result<ConfigStore> {
    match path {
        Some(path) => Ok(ConfigStore::with_path(path)),
        None => Ok(ConfigStore::new()?),
    }
}

pub fn controller() -> SystemController {
    ServiceController::new(
        SystemServiceManager::new(),
        ProcessTerminator::new(SystemProcessTable::new()),
    )
}
