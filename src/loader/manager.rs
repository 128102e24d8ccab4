//! Dynamic component/service loader
//!
//! Resolves locators to executable units through the injected `Resolver`,
//! with a locator-keyed in-memory cache. The public `load_*` methods never
//! fail: a failed resolution is logged and replaced by a fallback stand-in
//! so one broken plugin cannot take down the host. The `try_load_*`
//! variants surface the raw resolution error for callers, such as module
//! discovery, that must record failures instead of masking them.
//!
//! Cached instances are evicted only explicitly (`evict`, `clear_cache`,
//! or a feature being unregistered); there is no TTL expiry.

use crate::loader::error::ResolveResult;
use crate::loader::fallback::{FallbackComponent, FallbackService};
use crate::loader::traits::{Component, Resolver, Service};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cache occupancy and hit/miss counters
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub cached_components: usize,
    pub cached_services: usize,
    pub hits: usize,
    pub misses: usize,
}

/// Loader with per-locator caching and fallback substitution
pub struct ComponentLoader {
    resolver: Arc<dyn Resolver>,
    components: RwLock<HashMap<String, Arc<dyn Component>>>,
    services: RwLock<HashMap<String, Arc<dyn Service>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl ComponentLoader {
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self {
            resolver,
            components: RwLock::new(HashMap::new()),
            services: RwLock::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Load a renderable component, substituting a fallback on failure
    pub async fn load_component(&self, locator: &str) -> Arc<dyn Component> {
        match self.try_load_component(locator).await {
            Ok(component) => component,
            Err(err) => {
                log::error!("Component resolution failed for '{}': {}", locator, err);
                Arc::new(FallbackComponent::new(locator, &err.to_string()))
            }
        }
    }

    /// Load a callable service, substituting a fallback on failure
    pub async fn load_service(&self, locator: &str) -> Arc<dyn Service> {
        match self.try_load_service(locator).await {
            Ok(service) => service,
            Err(err) => {
                log::error!("Service resolution failed for '{}': {}", locator, err);
                Arc::new(FallbackService::new(locator, &err.to_string()))
            }
        }
    }

    /// Load a component, surfacing resolution failure to the caller
    ///
    /// Successful resolutions are cached; failures are not, so a later
    /// attempt after the implementation becomes available can succeed.
    pub async fn try_load_component(&self, locator: &str) -> ResolveResult<Arc<dyn Component>> {
        {
            let components = self.components.read().await;
            if let Some(component) = components.get(locator) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(component.clone());
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let component = self.resolver.resolve_component(locator).await?;
        log::debug!("Resolved component '{}'", locator);

        let mut components = self.components.write().await;
        let component = components
            .entry(locator.to_string())
            .or_insert(component)
            .clone();
        Ok(component)
    }

    /// Load a service, surfacing resolution failure to the caller
    pub async fn try_load_service(&self, locator: &str) -> ResolveResult<Arc<dyn Service>> {
        {
            let services = self.services.read().await;
            if let Some(service) = services.get(locator) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(service.clone());
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let service = self.resolver.resolve_service(locator).await?;
        log::debug!("Resolved service '{}'", locator);

        let mut services = self.services.write().await;
        let service = services.entry(locator.to_string()).or_insert(service).clone();
        Ok(service)
    }

    /// Evict a single locator from both caches
    pub async fn evict(&self, locator: &str) {
        let removed_component = self.components.write().await.remove(locator).is_some();
        let removed_service = self.services.write().await.remove(locator).is_some();
        if removed_component || removed_service {
            log::debug!("Evicted cached implementation for '{}'", locator);
        }
    }

    /// Clear both caches
    pub async fn clear_cache(&self) {
        self.components.write().await.clear();
        self.services.write().await.clear();
        log::debug!("Loader caches cleared");
    }

    /// Current cache occupancy and counters
    pub async fn cache_stats(&self) -> CacheStats {
        CacheStats {
            cached_components: self.components.read().await.len(),
            cached_services: self.services.read().await.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
