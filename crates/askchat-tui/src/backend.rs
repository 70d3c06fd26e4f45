//! Background task that owns the HTTP client.

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use askchat_client::{AskClient, AskResponse, ClientError};
use askchat_core::AskOutcome;

use crate::event::{BackendCommand, UiEvent};

/// Run the backend loop.
///
/// This runs in a separate thread with its own tokio runtime. It receives
/// questions from the UI thread, forwards them to the backend, and sends
/// exactly one `Resolved` event back for every question, on every path;
/// that event is what clears the busy flag on the UI side.
pub async fn run_backend(
    endpoint: String,
    ui_tx: mpsc::Sender<UiEvent>,
    mut cmd_rx: mpsc::Receiver<BackendCommand>,
) {
    let client = AskClient::new(&endpoint);
    info!(url = %client.ask_url(), "Backend task started");

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            BackendCommand::Ask(query) => {
                debug!(chars = query.len(), "Dispatching question");
                let outcome = outcome_from(client.ask(&query).await);
                if ui_tx.send(UiEvent::Resolved(outcome)).await.is_err() {
                    // UI side is gone
                    break;
                }
            }
            BackendCommand::Quit => {
                info!("Received quit command, shutting down backend");
                break;
            }
        }
    }

    info!("Backend shutdown complete");
}

/// Collapse a client result into the single outcome the UI understands.
///
/// The concrete failure cause is logged here and nowhere else.
fn outcome_from(result: Result<AskResponse, ClientError>) -> AskOutcome {
    match result {
        Ok(response) => AskOutcome::Answered(response.answer),
        Err(e) => {
            error!(error = %e, "Question failed");
            AskOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_passes_through() {
        let outcome = outcome_from(Ok(AskResponse {
            answer: Some("ML is...".to_string()),
        }));
        assert_eq!(outcome, AskOutcome::Answered(Some("ML is...".to_string())));
    }

    #[test]
    fn test_missing_answer_is_preserved_as_none() {
        let outcome = outcome_from(Ok(AskResponse { answer: None }));
        assert_eq!(outcome, AskOutcome::Answered(None));
    }

    #[test]
    fn test_server_error_collapses_to_failed() {
        let result = Err(ClientError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        });
        assert_eq!(outcome_from(result), AskOutcome::Failed);
    }

    #[test]
    fn test_decode_error_collapses_to_failed() {
        let result = Err(ClientError::Decode("not json".to_string()));
        assert_eq!(outcome_from(result), AskOutcome::Failed);
    }
}
