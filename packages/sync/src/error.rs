//! Controller error type.

use api::BackendError;
use thiserror::Error;

/// Why a controller operation did not take effect.
///
/// These never reach the user as a message; the controllers log them and hand
/// them back so callers can tell success from failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyncError {
    /// No user could be resolved for the current session.
    #[error("no authenticated user")]
    NoIdentity,

    /// A submit was requested with no form open.
    #[error("no draft to submit")]
    NoDraft,

    #[error(transparent)]
    Backend(#[from] BackendError),
}
