//! Event bus error types

use std::time::Duration;

pub use crate::core::pattern::PatternError;

/// Structural failure reported by an event handler
///
/// Handlers return this instead of throwing: failure is visible in the
/// dispatch summary and the audit log, never propagated to `emit`'s caller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HandlerError {
    #[error("Handler failed: {message}")]
    Failed { message: String },

    #[error("Handler timed out after {timeout:?}")]
    TimedOut { timeout: Duration },

    #[error("Handler panicked: {message}")]
    Panicked { message: String },
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}
