//! Loader error types

/// Result type for resolution operations
pub type ResolveResult<T> = Result<T, ResolveError>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolveError {
    #[error("No implementation registered for locator '{locator}'")]
    NotFound { locator: String },

    #[error("Implementation at '{locator}' failed to load: {cause}")]
    LoadFailed { locator: String, cause: String },
}

impl ResolveError {
    /// The locator the failure relates to
    pub fn locator(&self) -> &str {
        match self {
            ResolveError::NotFound { locator } => locator,
            ResolveError::LoadFailed { locator, .. } => locator,
        }
    }
}
