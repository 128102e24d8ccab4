//! Public API for the dynamic loader
//!
//! External modules should import from here rather than directly from
//! internal modules.

// Loader and cache introspection
pub use crate::loader::manager::{CacheStats, ComponentLoader};

// Error handling
pub use crate::loader::error::{ResolveError, ResolveResult};

// Executable unit contracts and the resolver seam
pub use crate::loader::traits::{
    Component, ComponentMetadata, FieldError, InputValidation, RenderOutput, Resolver, Service,
    ServiceMetadata,
};

// Concrete resolver and fallback stand-ins
pub use crate::loader::fallback::{FallbackComponent, FallbackService};
pub use crate::loader::resolver::RegistryResolver;
