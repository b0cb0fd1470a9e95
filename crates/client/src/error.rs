//! Unified error handling for client operations.
//!
//! Every command reports a user-facing outcome through the renderer; the
//! typed [`ClientError`] is what the list loaders return alongside so callers
//! and logs can tell the failure classes apart.

use reqwest::StatusCode;
use thiserror::Error;

use crate::api::TransportError;
use crate::config::ConfigError;
use crate::store::StoreError;

/// Application-level error type for the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be completed.
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// The service answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Raw response body.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Persisting the session failed.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The operation needs a logged-in session.
    #[error("not logged in")]
    NotLoggedIn,
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_display() {
        let err = ClientError::Status {
            status: StatusCode::CONFLICT,
            body: "Insufficient stock".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unexpected status 409 Conflict: Insufficient stock"
        );

        let err = ClientError::Transport(TransportError::Connection("refused".to_string()));
        assert_eq!(err.to_string(), "connection failed: refused");

        assert_eq!(ClientError::NotLoggedIn.to_string(), "not logged in");
    }
}
