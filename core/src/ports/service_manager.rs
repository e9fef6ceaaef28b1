//! Service manager port (interface).

use crate::domain::ServiceStatus;
use crate::error::Result;

/// Port for querying and commanding OS services by name.
///
/// `start` and `stop` only issue the command; waiting for the target state
/// is the caller's business. Every call resolves the service afresh.
pub trait ServiceManagerPort: Send + Sync {
    /// Query the current state and backing process id of a service.
    fn query(&self, name: &str) -> Result<ServiceStatus>;

    /// Ask the service manager to start a service.
    fn start(&self, name: &str) -> Result<()>;

    /// Ask the service manager to stop a service.
    fn stop(&self, name: &str) -> Result<()>;
}
