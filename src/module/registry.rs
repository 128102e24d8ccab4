//! In-memory module registry
//!
//! Holds the modules materialized by discovery: manifest, the locator the
//! implementation was resolved from, and the resolved component itself.
//! Never persisted; repopulated by a discovery scan after restart.

use crate::loader::traits::Component;
use crate::module::error::{ModuleError, ModuleResult};
use crate::module::types::ModuleManifest;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A module registered by discovery
#[derive(Clone)]
pub struct RegisteredModule {
    pub manifest: ModuleManifest,
    pub resolved_locator: String,
    pub component: Arc<dyn Component>,
}

impl std::fmt::Debug for RegisteredModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredModule")
            .field("module_id", &self.manifest.module_id)
            .field("resolved_locator", &self.resolved_locator)
            .finish()
    }
}

/// Module table keyed by module id
#[derive(Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, RegisteredModule>,
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.modules.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module, replacing any prior registration for its id
    pub fn register_module(&mut self, module: RegisteredModule) {
        let module_id = module.manifest.module_id.clone();
        if self.modules.insert(module_id.clone(), module).is_some() {
            log::warn!("Module '{}' replaced existing registration", module_id);
        }
    }

    pub fn get_module(&self, module_id: &str) -> Option<&RegisteredModule> {
        self.modules.get(module_id)
    }

    pub fn has_module(&self, module_id: &str) -> bool {
        self.modules.contains_key(module_id)
    }

    /// Sorted list of registered module ids
    pub fn module_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.modules.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Remove a module, honouring its manifest's unloadable flag
    ///
    /// Returns the removed entry so the caller can evict the cached
    /// implementation from the loader.
    pub fn unregister_module(&mut self, module_id: &str) -> ModuleResult<RegisteredModule> {
        match self.modules.get(module_id) {
            None => Err(ModuleError::ModuleNotFound {
                module_id: module_id.to_string(),
            }),
            Some(module) if !module.manifest.unloadable => Err(ModuleError::NotUnloadable {
                module_id: module_id.to_string(),
            }),
            Some(_) => Ok(self.modules.remove(module_id).expect("checked above")),
        }
    }

    pub fn clear(&mut self) {
        self.modules.clear();
    }
}

/// Thread-safe shared module registry
#[derive(Debug, Clone, Default)]
pub struct SharedModuleRegistry {
    inner: Arc<RwLock<ModuleRegistry>>,
}

impl SharedModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get access to the inner registry for read/write operations
    pub fn inner(&self) -> &Arc<RwLock<ModuleRegistry>> {
        &self.inner
    }

    pub async fn has_module(&self, module_id: &str) -> bool {
        self.inner.read().await.has_module(module_id)
    }

    pub async fn module_ids(&self) -> Vec<String> {
        self.inner.read().await.module_ids()
    }

    pub async fn module_count(&self) -> usize {
        self.inner.read().await.module_count()
    }

    pub async fn get_manifest(&self, module_id: &str) -> Option<ModuleManifest> {
        self.inner
            .read()
            .await
            .get_module(module_id)
            .map(|m| m.manifest.clone())
    }

    pub async fn register_module(&self, module: RegisteredModule) {
        self.inner.write().await.register_module(module);
    }

    pub async fn unregister_module(&self, module_id: &str) -> ModuleResult<RegisteredModule> {
        self.inner.write().await.unregister_module(module_id)
    }
}
