//! Public API for the feature registry
//!
//! External modules should import from here rather than directly from
//! internal modules.

// Registry
pub use crate::registry::manager::{FeatureRegistry, DEFAULT_EXECUTE_TIMEOUT};

// Error handling
pub use crate::registry::error::{RegistryError, RegistryResult};

// Declarations, filters and the in-band execution result
pub use crate::registry::types::{
    ErrorCode, ExecutionContext, ExecutionError, ExecutionResult, FeatureConfig,
    FeatureDeclaration, FeatureFilter,
};
