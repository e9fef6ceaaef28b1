//! Error types for the svcwarden-core library.

use thiserror::Error;

/// Result type alias for svcwarden operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the service manager or loading configuration.
///
/// The supervision components never hand these to their callers; they are
/// converted into logged events and outcome values at the component boundary.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to execute a system command.
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// Failed to parse command output.
    #[error("Failed to parse output: {0}")]
    ParseError(String),

    /// The named service does not exist or cannot be opened.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Permission denied for an operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Platform not supported.
    #[error("Platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// Errors that can occur while terminating a single process.
#[derive(Debug, Error)]
pub enum KillError {
    /// The specified process was not found
    #[error("Process with PID {0} not found")]
    ProcessNotFound(u32),

    /// Permission denied to kill the process
    #[error("Permission denied to kill process {0}")]
    PermissionDenied(u32),

    /// Failed to execute the kill or enumeration command
    #[error("Failed to execute command: {0}")]
    CommandFailed(String),

    /// The process could not be terminated
    #[error("Failed to terminate process {0}: {1}")]
    TerminationFailed(u32, String),

    /// An I/O error occurred
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kill_error_display() {
        let err = KillError::ProcessNotFound(1234);
        assert!(err.to_string().contains("1234"));

        let err = KillError::PermissionDenied(5678);
        assert!(err.to_string().contains("5678"));

        let err = KillError::TerminationFailed(42, "busy".to_string());
        assert_eq!(err.to_string(), "Failed to terminate process 42: busy");
    }

    #[test]
    fn test_error_display() {
        let err = Error::ServiceUnavailable("agent".to_string());
        assert_eq!(err.to_string(), "Service unavailable: agent");
    }
}
