//! Backend error type.

use thiserror::Error;

/// Failure of a single backend call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    /// No valid session, or the token was refused.
    #[error("not authenticated")]
    Unauthorized,

    /// The addressed row does not exist (or is not visible to this user).
    #[error("row not found: {0}")]
    NotFound(String),

    /// The backend answered but refused the request.
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body did not have the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),

    /// The client is missing required configuration.
    #[error("backend not configured: {0}")]
    Config(String),
}

impl BackendError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}
