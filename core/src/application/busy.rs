//! Busy-check state and the busy reporter.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::BusyStatus;

/// Process-wide busy-check marker path.
///
/// Single writer wins: a store replaces the path wholesale and a reader sees
/// the most recently completed store. Readers may act on a path that is being
/// replaced concurrently; that staleness is accepted.
#[derive(Debug, Default)]
pub struct BusyCheckState {
    path: RwLock<Option<PathBuf>>,
}

impl BusyCheckState {
    /// Create an unset state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the marker path. Blank values unset it.
    pub fn store(&self, value: Option<&str>) {
        let path = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        *self.path.write() = path;
    }

    /// Current marker path, if any.
    pub fn load(&self) -> Option<PathBuf> {
        self.path.read().clone()
    }
}

/// Answers the host's busy polls from the marker file.
///
/// The supervised service writes the marker once it is ready; while it is
/// missing the instance reports busy so the host holds off routing work here.
pub struct BusyReporter {
    state: Arc<BusyCheckState>,
}

impl BusyReporter {
    pub fn new(state: Arc<BusyCheckState>) -> Self {
        Self { state }
    }

    /// Report busy iff a marker path is configured and the file does not exist.
    pub fn on_busy_poll(&self) -> BusyStatus {
        let Some(path) = self.state.load() else {
            return BusyStatus::Idle;
        };

        let status = status_for(&path);
        debug!(path = %path.display(), status = ?status, "Busy poll");
        status
    }
}

fn status_for(path: &Path) -> BusyStatus {
    if path.exists() {
        BusyStatus::Idle
    } else {
        BusyStatus::Busy
    }
}
