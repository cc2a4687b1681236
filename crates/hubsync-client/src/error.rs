//! Error types for Docker Hub API operations.

use thiserror::Error;

/// Errors returned by the Docker Hub client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The login exchange was rejected or returned no token.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The API answered with a status outside the 2xx range.
    #[error("Request to {endpoint} failed with status {status}")]
    Status {
        /// Endpoint that was called, e.g. `GET /v2/orgs/acme/groups/`.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body, if any was readable.
        body: String,
    },

    /// The request never produced a response.
    #[error("Network error calling {endpoint}: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the JSON we expected.
    #[error("Failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The `next` link of a list response could not be turned into a cursor.
    #[error("Invalid next page link: {0}")]
    InvalidNextLink(String),

    /// A stored page marker is not a valid page number.
    #[error("Invalid page cursor: {0}")]
    InvalidCursor(String),

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The local credential store could not be read.
    #[error("Credential store error: {0}")]
    CredentialStore(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ClientError {
    /// HTTP status code, when the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the API rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
