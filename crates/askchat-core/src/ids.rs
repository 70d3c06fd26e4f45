//! Newtype wrapper for message identifiers.

use uuid::Uuid;

/// Unique identifier for a Message.
///
/// Randomly generated, so two messages created within the same clock
/// tick still get distinct ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageId(String);

impl MessageId {
    /// Generate a new random MessageId.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}
