//! Backing store error types

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Backing store unavailable: {message}")]
    Unavailable { message: String },

    #[error("Store operation '{operation}' failed: {message}")]
    OperationFailed { operation: String, message: String },
}

/// Result type for backing store operations
pub type StoreResult<T> = Result<T, StoreError>;
