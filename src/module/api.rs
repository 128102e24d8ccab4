//! Public API for the module subsystem
//!
//! External modules should import from here rather than directly from
//! internal modules.

// Discovery and validation
pub use crate::module::discovery::ModuleDiscovery;
pub use crate::module::validator::ModuleValidator;

// Registry and registered entries
pub use crate::module::registry::{ModuleRegistry, RegisteredModule, SharedModuleRegistry};

// Error handling
pub use crate::module::error::{ModuleError, ModuleResult};

// Declarations, manifests and scan outcomes
pub use crate::module::types::{
    ComponentValidation, DiscoveryOutcome, ModuleDeclaration, ModuleFailure, ModuleManifest,
    DEFAULT_LOAD_ORDER, DEFAULT_MODULE_VERSION,
};
