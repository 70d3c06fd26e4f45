//! Backend client library for the AskChat TUI.
//!
//! Provides the HTTP client for the question-answering endpoint.

pub mod error;
pub mod http;
pub mod types;

pub use error::ClientError;
pub use http::AskClient;
pub use types::{AskRequest, AskResponse};
