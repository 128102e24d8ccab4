//! Module discovery
//!
//! Bootstrap path of the runtime: reads active module declarations from
//! the backing store, resolves each one's implementation through the
//! loader, synthesizes a manifest and registers it into the module table.
//! Failures are collected per module; one broken module never aborts the
//! scan.

use crate::loader::api::ComponentLoader;
use crate::loader::error::ResolveResult;
use crate::loader::traits::Component;
use crate::module::registry::{RegisteredModule, SharedModuleRegistry};
use crate::module::types::{DiscoveryOutcome, ModuleDeclaration, ModuleFailure, ModuleManifest};
use crate::store::api::{BackingStore, StoreResult};
use std::sync::Arc;

/// Locator conventions tried for a module id, in order
///
/// First successful resolution wins; later conventions are not attempted
/// once one succeeds.
pub(crate) fn locator_candidates(module_id: &str) -> Vec<String> {
    vec![
        format!("modules/{}/index", module_id),
        format!("modules/{}/Component", module_id),
        format!("modules/{}/{}", module_id, module_id),
        format!("modules/{}", module_id),
    ]
}

/// Try each locator convention through the loader; first hit wins
pub(crate) async fn resolve_by_convention(
    loader: &ComponentLoader,
    module_id: &str,
) -> ResolveResult<(String, Arc<dyn Component>)> {
    let mut last_error = None;
    for locator in locator_candidates(module_id) {
        match loader.try_load_component(&locator).await {
            Ok(component) => return Ok((locator, component)),
            Err(err) => {
                log::trace!("Locator '{}' did not resolve: {}", locator, err);
                last_error = Some(err);
            }
        }
    }
    // The candidate list is never empty, so an error is always present here
    Err(last_error.expect("at least one locator candidate"))
}

pub struct ModuleDiscovery {
    store: Arc<dyn BackingStore>,
    loader: Arc<ComponentLoader>,
    registry: SharedModuleRegistry,
}

impl ModuleDiscovery {
    pub fn new(
        store: Arc<dyn BackingStore>,
        loader: Arc<ComponentLoader>,
        registry: SharedModuleRegistry,
    ) -> Self {
        Self {
            store,
            loader,
            registry,
        }
    }

    /// Scan all active module declarations and register the resolvable ones
    ///
    /// Returns an outcome whose `registered` and `failed` lists partition
    /// the scanned set: every declaration lands in exactly one of the two.
    /// Only a backing-store read failure aborts the scan.
    pub async fn discover_and_register(&self) -> StoreResult<DiscoveryOutcome> {
        let declarations = self.store.list_active_modules().await?;
        log::debug!("Discovered {} active module declarations", declarations.len());

        let mut outcome = DiscoveryOutcome::default();
        for declaration in declarations {
            match self.register_one(&declaration).await {
                Ok(()) => outcome.registered.push(declaration.module_id.clone()),
                Err(error) => {
                    log::warn!(
                        "Module '{}' failed to register: {}",
                        declaration.module_id,
                        error
                    );
                    outcome.failed.push(ModuleFailure {
                        module_id: declaration.module_id.clone(),
                        error,
                    });
                }
            }
        }

        log::info!(
            "Module scan complete: {} registered, {} failed",
            outcome.registered.len(),
            outcome.failed.len()
        );
        Ok(outcome)
    }

    async fn register_one(&self, declaration: &ModuleDeclaration) -> Result<(), String> {
        let (resolved_locator, component) =
            resolve_by_convention(&self.loader, &declaration.module_id)
                .await
                .map_err(|err| err.to_string())?;

        let manifest = ModuleManifest::from_declaration(declaration);
        self.registry
            .register_module(RegisteredModule {
                manifest,
                resolved_locator,
                component,
            })
            .await;
        Ok(())
    }
}
