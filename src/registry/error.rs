//! Feature registry error types
//!
//! These cover the administrative surface only. The execution path never
//! returns an error: `execute_feature` reports every failure in-band
//! through `ExecutionResult`.

use crate::store::api::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Feature not found: {feature_id}")]
    FeatureNotFound { feature_id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for administrative registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
