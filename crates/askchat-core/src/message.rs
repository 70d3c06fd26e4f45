//! Chat message types for the conversation history.

use chrono::{DateTime, Utc};

use crate::ids::MessageId;

/// Role of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Typed by the user (plain text).
    User,
    /// Produced by the backend (Markdown).
    Bot,
}

/// A message in the conversation history.
///
/// Messages are append-only: once created they are never mutated or
/// removed for the lifetime of the session. The timestamp is captured at
/// construction and used only for display.
#[derive(Debug, Clone)]
pub struct Message {
    /// Unique identifier for this message.
    pub id: MessageId,
    /// Who produced this message.
    pub role: Role,
    /// Message content.
    pub content: String,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new message with a fresh id and timestamp.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a bot message.
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Role::Bot, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_constructors() {
        let user = Message::user("hello");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "hello");

        let bot = Message::bot("world");
        assert_eq!(bot.role, Role::Bot);
    }

    #[test]
    fn test_messages_get_distinct_ids() {
        let a = Message::user("same content");
        let b = Message::user("same content");
        assert_ne!(a.id, b.id);
    }
}
