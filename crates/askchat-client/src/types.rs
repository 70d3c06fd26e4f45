//! Wire types for the question-answering endpoint.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/ask`.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest {
    /// The trimmed question text.
    pub query: String,
}

/// Response body from `POST /api/ask`.
///
/// The backend echoes the question alongside the answer; only the answer
/// matters here, and it may be absent.
#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,
}
