//! Adapters layer - External system implementations.
//!
//! This module contains implementations of the port traits defined in `ports`.
//! Each adapter handles communication with external systems.

pub mod process;
pub mod service;
pub mod settings;

// Re-export main types for convenience
pub use process::SystemProcessTable;
pub use service::SystemServiceManager;
pub use settings::MemorySettings;
