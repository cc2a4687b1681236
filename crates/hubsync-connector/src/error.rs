//! Error types for the connector crate.

use hubsync_client::ClientError;
use thiserror::Error;

/// Errors that can occur while synchronizing.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Credentials were rejected before any sync began.
    #[error("authentication failed: {0}")]
    Authentication(#[source] ClientError),

    /// An API call failed; `context` names the operation and its parent.
    #[error("failed to {context}: {source}")]
    Api {
        context: String,
        #[source]
        source: ClientError,
    },

    /// A continuation token could not be decoded.
    #[error("invalid page token: {0}")]
    InvalidPageToken(String),

    /// A resource lacks data that `List` always attaches.
    #[error("missing context: {0}")]
    MissingContext(String),

    /// Invalid input was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ConnectorError {
    /// Wrap a client error with the operation that produced it.
    pub fn api(context: impl Into<String>, source: ClientError) -> Self {
        Self::Api {
            context: context.into(),
            source,
        }
    }
}

/// Result type for connector operations.
pub type Result<T> = std::result::Result<T, ConnectorError>;
