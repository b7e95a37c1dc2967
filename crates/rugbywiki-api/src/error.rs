// Error type for backend requests.

use thiserror::Error;

/// A failed backend request.
///
/// Every variant except `Client` names the resource being fetched (entity
/// plus parameters) so the message is meaningful on its own.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid URL for {resource}: {message}")]
    Url { resource: String, message: String },

    #[error("request for {resource} failed: {source}")]
    Transport {
        resource: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error! status: {status}, message: {body}")]
    Status {
        resource: String,
        status: u16,
        body: String,
    },

    #[error("unexpected response for {resource}: {source}")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status code, when the backend answered with a non-success status.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body captured from a non-success response.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}
