//! Shop API errors.

use thiserror::Error;

/// Errors that can occur when talking to the shop API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered but its body could not be read in full.
    #[error("Failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The bearer token was missing, expired, or rejected.
    #[error("Unauthorized")]
    Unauthorized,

    /// Non-success status without a readable message.
    #[error("API returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// First part of the response body.
        body: String,
    },

    /// The API answered but refused the operation.
    #[error("Rejected: {0}")]
    Rejected(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// True when the failure is a connectivity problem rather than an
    /// answer from the server.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}
