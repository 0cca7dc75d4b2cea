//! Generative-AI collaborators: the narrow client interface, prompt
//! construction, and the follow-up Q&A helper.

mod client;
mod followup;
pub mod prompt;

pub use client::{GeminiClient, GenerativeClient};
pub use followup::FollowUpClient;

/// The single error kind crossing the question-source / follow-up boundary.
/// Transport failures, failed service responses, and schema-validation
/// failures all surface as this type; nothing rawer leaks past it.
#[derive(Debug, Clone)]
pub enum GenerationError {
    /// Request never completed (connect, timeout, ...).
    Transport(String),
    /// Service responded with a non-success status.
    Api { status: u16, message: String },
    /// Response arrived but could not be decoded into the expected shape.
    Parse(String),
    /// Decoded record violated a content rule (empty prompt, bad options).
    Invalid(String),
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::Transport(msg) => write!(f, "request failed: {}", msg),
            GenerationError::Api { status, message } => {
                write!(f, "service error {}: {}", status, message)
            }
            GenerationError::Parse(msg) => write!(f, "unexpected response: {}", msg),
            GenerationError::Invalid(msg) => write!(f, "invalid question: {}", msg),
        }
    }
}

impl std::error::Error for GenerationError {}
