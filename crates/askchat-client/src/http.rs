//! HTTP client for the question-answering endpoint.

use tracing::debug;

use crate::error::ClientError;
use crate::types::{AskRequest, AskResponse};

/// Path of the ask endpoint, appended to the configured base URL.
const ASK_PATH: &str = "/api/ask";

/// Client for the question-answering backend.
pub struct AskClient {
    inner: reqwest::Client,
    base_url: String,
}

impl AskClient {
    /// Create a new client for the given base URL.
    ///
    /// A trailing slash on the base is tolerated. An empty base is valid
    /// and yields the bare relative path.
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL questions are sent to.
    pub fn ask_url(&self) -> String {
        format!("{}{}", self.base_url, ASK_PATH)
    }

    /// Send a question and return the decoded response body.
    ///
    /// No retry and no timeout: one request per call, resolved when the
    /// server answers or the transport fails.
    pub async fn ask(&self, query: &str) -> Result<AskResponse, ClientError> {
        let url = self.ask_url();
        debug!(url = %url, "POST question");

        let response = self
            .inner
            .post(&url)
            .json(&AskRequest {
                query: query.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { status });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_url_joins_base_and_path() {
        let client = AskClient::new("http://127.0.0.1:8000");
        assert_eq!(client.ask_url(), "http://127.0.0.1:8000/api/ask");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = AskClient::new("http://127.0.0.1:8000/");
        assert_eq!(client.ask_url(), "http://127.0.0.1:8000/api/ask");
    }

    #[test]
    fn test_empty_base_yields_relative_path() {
        let client = AskClient::new("");
        assert_eq!(client.ask_url(), "/api/ask");
    }
}
