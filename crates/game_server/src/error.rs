//! Error types and handling for the game server.
//!
//! This module defines the errors raised by the server loop itself. Game-level
//! rejections live in [`crate::session::SessionError`] and frame validation
//! failures in [`crate::security::SecurityError`].

/// Enumeration of possible server errors.
///
/// Categorizes errors into network-related and internal server errors
/// to help with debugging and error handling.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Network-related errors such as binding failures or connection issues
    #[error("Network error: {0}")]
    Network(String),

    /// Internal server errors such as malformed outbound payloads
    #[error("Internal error: {0}")]
    Internal(String),
}
