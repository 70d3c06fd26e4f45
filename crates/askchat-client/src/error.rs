//! Error types for the backend client.

use thiserror::Error;

/// Errors that can occur when querying the backend.
///
/// The UI shows one generic message for all of these; the variants exist
/// so the failure cause can be logged before it is collapsed.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connection, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server replied with a non-success status.
    #[error("server returned {status}")]
    Status { status: reqwest::StatusCode },

    /// Response body did not decode as the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}
