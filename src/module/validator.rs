//! Module validation
//!
//! Checks that a declared module's backing row and its resolved
//! implementation are structurally consistent. Hard errors (missing
//! declaration, nothing resolvable) block activation; soft warnings
//! (implementation lacks self-describing metadata) surface in tooling
//! without blocking.

use crate::loader::api::ComponentLoader;
use crate::module::discovery::resolve_by_convention;
use crate::module::types::ComponentValidation;
use crate::store::api::BackingStore;
use std::sync::Arc;

pub struct ModuleValidator {
    store: Arc<dyn BackingStore>,
    loader: Arc<ComponentLoader>,
}

impl ModuleValidator {
    pub fn new(store: Arc<dyn BackingStore>, loader: Arc<ComponentLoader>) -> Self {
        Self { store, loader }
    }

    /// Validate one module's declaration and implementation
    pub async fn validate(&self, module_id: &str) -> ComponentValidation {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let declaration = match self.store.list_active_modules().await {
            Ok(declarations) => declarations.into_iter().find(|d| d.module_id == module_id),
            Err(err) => {
                errors.push(format!("Backing store read failed: {}", err));
                return ComponentValidation {
                    is_valid: false,
                    errors,
                    warnings,
                };
            }
        };

        if declaration.is_none() {
            errors.push(format!(
                "No active declaration for module '{}' in the backing store",
                module_id
            ));
        }

        match resolve_by_convention(&self.loader, module_id).await {
            Ok((locator, component)) => {
                if component.metadata().is_none() {
                    warnings.push(format!(
                        "Implementation at '{}' does not expose component metadata",
                        locator
                    ));
                }
            }
            Err(err) => {
                errors.push(format!(
                    "No implementation resolvable for module '{}': {}",
                    module_id, err
                ));
            }
        }

        ComponentValidation {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}
