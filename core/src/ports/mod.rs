//! Ports layer - Trait definitions (interfaces).
//!
//! This module defines the interfaces that the application layer uses
//! to interact with external systems. Implementations live in `adapters`.

mod lifecycle;
mod process_table;
mod service_manager;
mod settings;

pub use lifecycle::ServiceLifecycle;
pub use process_table::ProcessTablePort;
pub use service_manager::ServiceManagerPort;
pub use settings::SettingsSource;
