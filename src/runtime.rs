//! Runtime composition root
//!
//! Wires the backing store, resolver, loader, module subsystem, feature
//! registry and event bus into one object graph. All collaborators are
//! injected rather than reached through globals, so tests and embedders
//! can assemble a runtime around any `BackingStore` and resolver they
//! choose.

use crate::events::api::{EventBus, EventBusConfig, EVENT_HISTORY_LIMIT};
use crate::loader::api::{ComponentLoader, RegistryResolver};
use crate::module::api::{
    ComponentValidation, DiscoveryOutcome, ModuleDiscovery, ModuleResult, ModuleValidator,
    RegisteredModule, SharedModuleRegistry,
};
use crate::registry::api::{FeatureRegistry, DEFAULT_EXECUTE_TIMEOUT};
use crate::store::api::{BackingStore, StoreResult};
use std::sync::Arc;
use std::time::Duration;

/// Tunables applied when assembling a runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Upper bound on one feature execution
    pub execute_timeout: Duration,
    /// Upper bound on one event handler invocation
    pub handler_timeout: Duration,
    /// Event history ring capacity
    pub history_limit: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            execute_timeout: DEFAULT_EXECUTE_TIMEOUT,
            handler_timeout: Duration::from_secs(10),
            history_limit: EVENT_HISTORY_LIMIT,
        }
    }
}

/// The assembled plugin runtime
pub struct PluginRuntime {
    store: Arc<dyn BackingStore>,
    resolver: Arc<RegistryResolver>,
    loader: Arc<ComponentLoader>,
    modules: SharedModuleRegistry,
    discovery: ModuleDiscovery,
    validator: ModuleValidator,
    features: FeatureRegistry,
    events: Arc<EventBus>,
}

impl PluginRuntime {
    /// Assemble a runtime with default tunables
    pub fn new(store: Arc<dyn BackingStore>) -> Self {
        Self::with_config(store, RuntimeConfig::default())
    }

    /// Assemble a runtime with explicit tunables
    pub fn with_config(store: Arc<dyn BackingStore>, config: RuntimeConfig) -> Self {
        let resolver = Arc::new(RegistryResolver::new());
        let loader = Arc::new(ComponentLoader::new(resolver.clone()));
        let modules = SharedModuleRegistry::new();

        let events = Arc::new(EventBus::new(store.clone()).with_config(EventBusConfig {
            handler_timeout: config.handler_timeout,
            history_limit: config.history_limit,
        }));

        let discovery = ModuleDiscovery::new(store.clone(), loader.clone(), modules.clone());
        let validator = ModuleValidator::new(store.clone(), loader.clone());
        let features = FeatureRegistry::new(store.clone(), loader.clone(), events.clone())
            .with_execute_timeout(config.execute_timeout);

        log::debug!("Plugin runtime assembled");
        Self {
            store,
            resolver,
            loader,
            modules,
            discovery,
            validator,
            features,
            events,
        }
    }

    /// The backing store the runtime was assembled around
    pub fn store(&self) -> &Arc<dyn BackingStore> {
        &self.store
    }

    /// The resolver implementations register themselves with
    pub fn resolver(&self) -> &Arc<RegistryResolver> {
        &self.resolver
    }

    pub fn loader(&self) -> &Arc<ComponentLoader> {
        &self.loader
    }

    pub fn modules(&self) -> &SharedModuleRegistry {
        &self.modules
    }

    pub fn features(&self) -> &FeatureRegistry {
        &self.features
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Run a module discovery scan against the backing store
    pub async fn discover_modules(&self) -> StoreResult<DiscoveryOutcome> {
        self.discovery.discover_and_register().await
    }

    /// Validate one module's declaration and implementation
    pub async fn validate_module(&self, module_id: &str) -> ComponentValidation {
        self.validator.validate(module_id).await
    }

    /// Unload a module and evict its cached implementation
    ///
    /// Fails when the module is unknown or its manifest forbids unloading.
    pub async fn unload_module(&self, module_id: &str) -> ModuleResult<RegisteredModule> {
        let removed = self.modules.unregister_module(module_id).await?;
        self.loader.evict(&removed.resolved_locator).await;
        log::info!("Unloaded module '{}'", module_id);
        Ok(removed)
    }
}
