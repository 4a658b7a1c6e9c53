use thiserror::Error;

/// Errors raised by connection decisions and listings.
///
/// State-machine violations (Forbidden, InvalidState) are rejected
/// synchronously with no mutation. Chat-room or notification failures after
/// the decisive transition are not errors here - they are logged and the
/// already-transitioned connection is returned.
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Connection not found")]
    NotFound,

    #[error("Only the helper or seeker on a connection may decide on it")]
    Forbidden,

    #[error("Invalid state transition: {0}")]
    InvalidState(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
