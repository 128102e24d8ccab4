//! Module subsystem error types

#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error("Module not found: {module_id}")]
    ModuleNotFound { module_id: String },

    #[error("Module '{module_id}' is declared non-unloadable")]
    NotUnloadable { module_id: String },
}

/// Result type for module registry operations
pub type ModuleResult<T> = Result<T, ModuleError>;
