//! Error types for ipfabric-client
//!
//! This module defines all error types used throughout the client and CLI,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for ipfabric-client operations
///
/// Covers configuration problems detected at startup, connectivity and
/// authentication failures during client construction, snapshot selector
/// resolution, column discovery, and HTTP failures while paging through
/// table queries.
#[derive(Error, Debug)]
pub enum IpfError {
    /// Configuration-related errors (missing base URL or token, bad values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The server could not be reached or rejected the credentials
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server responded but the payload did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A caller-supplied argument was rejected (e.g. unknown snapshot ID)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No snapshot satisfies the requested selector
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server broke the column-discovery error contract
    #[error("Protocol violation: {0}")]
    Protocol(String),

    /// Non-success HTTP status returned by the API
    #[error("HTTP status {status} from {url}: {body}")]
    Status {
        /// Numeric HTTP status code
        status: u16,
        /// Request URL
        url: String,
        /// Response body text (may be empty)
        body: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl IpfError {
    /// Returns the HTTP status code when this is a [`IpfError::Status`] error
    pub fn status(&self) -> Option<u16> {
        match self {
            IpfError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for ipfabric-client operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation. Callers that
/// need to branch on the failure kind downcast to [`IpfError`].
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = IpfError::Config("IPF_URL not set".to_string());
        assert_eq!(error.to_string(), "Configuration error: IPF_URL not set");
    }

    #[test]
    fn test_not_found_error_display() {
        let error = IpfError::NotFound("no locked snapshot".to_string());
        assert_eq!(error.to_string(), "Not found: no locked snapshot");
    }

    #[test]
    fn test_status_error_display() {
        let error = IpfError::Status {
            status: 500,
            url: "http://localhost/api/v1/tables/inventory/sites".to_string(),
            body: "boom".to_string(),
        };
        let s = error.to_string();
        assert!(s.contains("500"));
        assert!(s.contains("tables/inventory/sites"));
        assert_eq!(error.status(), Some(500));
    }

    #[test]
    fn test_status_accessor_on_other_variants() {
        assert_eq!(IpfError::Protocol("x".into()).status(), None);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let error: IpfError = json_error.into();
        assert!(matches!(error, IpfError::Serialization(_)));
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = IpfError::InvalidArgument("bad id".into()).into();
        assert!(matches!(
            err.downcast_ref::<IpfError>(),
            Some(IpfError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IpfError>();
    }
}
