//! Security module for inbound frame validation.
//!
//! Frames are checked against the [`SecurityConfig`](crate::config::SecurityConfig)
//! limits before they are parsed into client messages.

pub mod input_validation;

pub use input_validation::validate_json_message;

/// Security-related errors
#[derive(Debug, thiserror::Error)]
pub enum SecurityError {
    #[error("Message too large: {0} bytes")]
    MessageTooLarge(usize),

    #[error("Invalid message format: {0}")]
    InvalidMessageFormat(String),
}

impl SecurityError {
    /// Stable identifier sent to clients in `error` frames.
    pub fn code(&self) -> &'static str {
        match self {
            SecurityError::MessageTooLarge(_) => "message-too-large",
            SecurityError::InvalidMessageFormat(_) => "invalid-message",
        }
    }
}
