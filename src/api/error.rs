//! Backend error types.

use thiserror::Error;

/// Errors that can occur when talking to the estimate backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: connection, timeout, TLS.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("Unknown error"))]
    Api {
        status: u16,
        /// `message` field of the JSON error body, if it had one.
        message: Option<String>,
    },

    /// A body that should have been JSON could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}
