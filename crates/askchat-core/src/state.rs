//! Headless chat state: message history, input text, busy flag.

use crate::message::Message;

/// Shown when a success response carries no answer field.
pub const FALLBACK_ANSWER: &str = "Sorry, couldn't get a response.";

/// Shown for any transport, status, or decode failure.
pub const ERROR_ANSWER: &str =
    "An error occurred while getting the response. Please check the server connection.";

/// Result of a dispatched question, as seen by the state machine.
///
/// The concrete failure cause is logged where it occurs; by the time it
/// reaches the state machine every failure has collapsed to `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskOutcome {
    /// HTTP success; `None` when the body had no answer field.
    Answered(Option<String>),
    /// Network failure, non-success status, or undecodable body.
    Failed,
}

/// Chat state: ordered message history plus the transient input text and
/// busy flag.
///
/// Separated from rendering so submission behavior can be exercised
/// without a terminal. The history is append-only; insertion order is
/// display order.
#[derive(Default)]
pub struct ChatState {
    /// Conversation history, oldest first.
    pub messages: Vec<Message>,
    /// Text currently in the input field. May contain newlines.
    pub input: String,
    /// True while a question is in flight. Gates submission.
    pub busy: bool,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit the current input.
    ///
    /// A no-op while a question is already in flight or when the trimmed
    /// input is empty. Otherwise appends the user message, clears the
    /// input, raises the busy flag, and returns the query the caller must
    /// dispatch. The user message is always appended before the caller
    /// can issue any request.
    pub fn submit(&mut self) -> Option<String> {
        if self.busy {
            return None;
        }
        let query = self.input.trim();
        if query.is_empty() {
            return None;
        }
        let query = query.to_string();
        self.messages.push(Message::user(query.clone()));
        self.input.clear();
        self.busy = true;
        Some(query)
    }

    /// Apply the outcome of a dispatched question.
    ///
    /// Appends exactly one bot message and clears the busy flag. This is
    /// the only place the flag clears; the driver sends one outcome per
    /// dispatched query on every path.
    pub fn resolve(&mut self, outcome: AskOutcome) {
        let content = match outcome {
            AskOutcome::Answered(Some(answer)) => answer,
            AskOutcome::Answered(None) => FALLBACK_ANSWER.to_string(),
            AskOutcome::Failed => ERROR_ANSWER.to_string(),
        };
        self.messages.push(Message::bot(content));
        self.busy = false;
    }
}
