//! Event types for communication between the backend task and the UI.

use askchat_core::AskOutcome;

/// Events sent from the backend task to the UI thread.
#[derive(Debug)]
pub enum UiEvent {
    /// A dispatched question resolved (answer, fallback, or failure).
    Resolved(AskOutcome),
}

/// Commands sent from the UI to the backend task.
#[derive(Debug)]
pub enum BackendCommand {
    /// Send a question to the backend.
    Ask(String),

    /// Quit the application.
    Quit,
}
