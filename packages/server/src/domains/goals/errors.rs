use thiserror::Error;

/// Errors raised by goal lifecycle operations
#[derive(Error, Debug)]
pub enum GoalError {
    /// The embedding provider is a hard dependency of goal creation: when it
    /// fails, the goal is not persisted.
    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(#[source] anyhow::Error),

    #[error("Goal not found")]
    NotFound,

    #[error("Only the goal owner may do that")]
    Forbidden,

    #[error("Progress must be between 0 and 100, got {0}")]
    InvalidProgress(i32),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
