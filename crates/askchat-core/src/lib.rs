//! AskChat Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Terminal rendering
//! - Runtime specifics
//!
//! The chat state machine lives here so submission behavior can be
//! exercised without a terminal or a backend.

pub mod ids;
pub mod message;
pub mod state;

// Re-export commonly used types
pub use ids::MessageId;
pub use message::{Message, Role};
pub use state::{AskOutcome, ChatState, ERROR_ANSWER, FALLBACK_ANSWER};
