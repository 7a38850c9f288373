//! # Client Error Types
//!
//! Error types for catalog retrieval and client configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌──────────────────────────────┐  ┌──────────────────────────────┐    │
//! │  │  RetrievalFailure            │  │  ClientError                 │    │
//! │  │  (returned by search)        │  │  (setup / configuration)     │    │
//! │  │                              │  │                              │    │
//! │  │  Connection                  │  │  InvalidConfig               │    │
//! │  │  Timeout                     │  │  InvalidEndpoint             │    │
//! │  │  Status                      │  │  ConfigLoadFailed            │    │
//! │  │  InvalidPayload              │  │  ConfigSaveFailed            │    │
//! │  │  Request                     │  │  HttpClient                  │    │
//! │  └──────────────────────────────┘  └──────────────────────────────┘    │
//! │                                                                         │
//! │  Malformed records, non-array bodies and empty queries are NOT errors: │
//! │  they degrade to empty records or an empty catalog.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for client setup operations.
pub type ClientResult<T> = Result<T, ClientError>;

// =============================================================================
// Retrieval Failure
// =============================================================================

/// The catalog could not be fetched.
///
/// This is the only error [`CatalogStore::search`](crate::CatalogStore::search)
/// returns. Messages carry transport detail for logs; the store never copies
/// them into its user-facing status message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RetrievalFailure {
    /// The endpoint could not be reached.
    #[error("Catalog endpoint unreachable: {0}")]
    Connection(String),

    /// The endpoint did not answer in time.
    #[error("Catalog request timed out after {0} seconds")]
    Timeout(u64),

    /// The endpoint answered with a non-success status.
    #[error("Catalog endpoint returned HTTP {status}")]
    Status { status: u16 },

    /// The response body could not be read.
    #[error("Catalog payload is invalid: {0}")]
    InvalidPayload(String),

    /// Any other transport failure.
    #[error("Catalog request failed: {0}")]
    Request(String),
}

impl RetrievalFailure {
    /// Returns true if retrying the same request may succeed.
    ///
    /// ## Retryable
    /// - Connection failures
    /// - Timeouts
    /// - 5xx and 429 responses
    ///
    /// ## Not Retryable
    /// - Other 4xx responses
    /// - Unreadable payloads
    pub fn is_retryable(&self) -> bool {
        match self {
            RetrievalFailure::Connection(_) | RetrievalFailure::Timeout(_) => true,
            RetrievalFailure::Status { status } => *status >= 500 || *status == 429,
            RetrievalFailure::InvalidPayload(_) | RetrievalFailure::Request(_) => false,
        }
    }

    /// Classifies a reqwest error.
    ///
    /// `timeout_secs` is reported back in [`RetrievalFailure::Timeout`].
    pub fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            RetrievalFailure::Timeout(timeout_secs)
        } else if err.is_connect() {
            RetrievalFailure::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            RetrievalFailure::Status {
                status: status.as_u16(),
            }
        } else if err.is_decode() || err.is_body() {
            RetrievalFailure::InvalidPayload(err.to_string())
        } else {
            RetrievalFailure::Request(err.to_string())
        }
    }
}

// =============================================================================
// Client Error
// =============================================================================

/// Errors raised while setting up a client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The catalog endpoint is not a usable http(s) URL.
    #[error("Invalid catalog endpoint: {0}")]
    InvalidEndpoint(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to write the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidEndpoint(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_failures() {
        assert!(RetrievalFailure::Connection("refused".into()).is_retryable());
        assert!(RetrievalFailure::Timeout(10).is_retryable());
        assert!(RetrievalFailure::Status { status: 503 }.is_retryable());
        assert!(RetrievalFailure::Status { status: 429 }.is_retryable());

        assert!(!RetrievalFailure::Status { status: 404 }.is_retryable());
        assert!(!RetrievalFailure::InvalidPayload("eof".into()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            RetrievalFailure::Status { status: 502 }.to_string(),
            "Catalog endpoint returned HTTP 502"
        );
        assert_eq!(
            RetrievalFailure::Timeout(10).to_string(),
            "Catalog request timed out after 10 seconds"
        );
    }

    #[test]
    fn test_setup_error_conversions() {
        let err: ClientError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, ClientError::InvalidEndpoint(_)));

        let err: ClientError = toml::from_str::<toml::Table>("[source").unwrap_err().into();
        assert!(matches!(err, ClientError::ConfigLoadFailed(_)));
    }
}
