//! Registry-backed resolver
//!
//! Resolves locators against an in-memory table of registered factories.
//! This is the resolver the host wires up for built-in implementations;
//! other resolver kinds plug in behind the same `Resolver` trait.

use crate::loader::error::{ResolveError, ResolveResult};
use crate::loader::traits::{Component, Resolver, Service};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type ComponentFactory = Arc<dyn Fn() -> Arc<dyn Component> + Send + Sync>;
type ServiceFactory = Arc<dyn Fn() -> Arc<dyn Service> + Send + Sync>;

/// Resolver backed by in-process factory registrations
#[derive(Default)]
pub struct RegistryResolver {
    components: RwLock<HashMap<String, ComponentFactory>>,
    services: RwLock<HashMap<String, ServiceFactory>>,
}

impl RegistryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component factory under a locator
    pub async fn register_component<F>(&self, locator: &str, factory: F)
    where
        F: Fn() -> Arc<dyn Component> + Send + Sync + 'static,
    {
        let mut components = self.components.write().await;
        if components
            .insert(locator.to_string(), Arc::new(factory))
            .is_some()
        {
            log::warn!("Component factory for '{}' replaced", locator);
        }
    }

    /// Register a service factory under a locator
    pub async fn register_service<F>(&self, locator: &str, factory: F)
    where
        F: Fn() -> Arc<dyn Service> + Send + Sync + 'static,
    {
        let mut services = self.services.write().await;
        if services
            .insert(locator.to_string(), Arc::new(factory))
            .is_some()
        {
            log::warn!("Service factory for '{}' replaced", locator);
        }
    }

    /// Remove all registered factories
    pub async fn clear(&self) {
        self.components.write().await.clear();
        self.services.write().await.clear();
    }
}

#[async_trait::async_trait]
impl Resolver for RegistryResolver {
    async fn resolve_component(&self, locator: &str) -> ResolveResult<Arc<dyn Component>> {
        let components = self.components.read().await;
        match components.get(locator) {
            Some(factory) => Ok(factory()),
            None => Err(ResolveError::NotFound {
                locator: locator.to_string(),
            }),
        }
    }

    async fn resolve_service(&self, locator: &str) -> ResolveResult<Arc<dyn Service>> {
        let services = self.services.read().await;
        match services.get(locator) {
            Some(factory) => Ok(factory()),
            None => Err(ResolveError::NotFound {
                locator: locator.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::traits::RenderOutput;
    use serde_json::Value;

    struct StubComponent;

    impl Component for StubComponent {
        fn render(&self, _props: &Value) -> RenderOutput {
            RenderOutput::content("<div>stub</div>")
        }
    }

    #[tokio::test]
    async fn test_resolve_registered_component() {
        let resolver = RegistryResolver::new();
        resolver
            .register_component("modules/panel/index", || Arc::new(StubComponent))
            .await;

        let component = resolver
            .resolve_component("modules/panel/index")
            .await
            .unwrap();
        assert!(!component.render(&Value::Null).is_error);
    }

    #[tokio::test]
    async fn test_unknown_locator_is_not_found() {
        let resolver = RegistryResolver::new();

        let err = resolver
            .resolve_component("modules/missing/index")
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ResolveError::NotFound { .. }));
        assert_eq!(err.locator(), "modules/missing/index");

        let err = resolver
            .resolve_service("services/missing")
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ResolveError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_clear_removes_registrations() {
        let resolver = RegistryResolver::new();
        resolver
            .register_component("modules/panel/index", || Arc::new(StubComponent))
            .await;
        resolver.clear().await;

        assert!(resolver
            .resolve_component("modules/panel/index")
            .await
            .is_err());
    }
}
