//! Feature registry
//!
//! System of record for feature plugins: declaration lifecycle
//! (idempotent upsert, soft delete), filtered lookups, and the end-to-end
//! execution pipeline (resolve declaration, load service, validate input,
//! execute, time it). Nothing on the execution path escapes as an error;
//! every failure is an in-band `ExecutionResult`.

use crate::events::api::EventBus;
use crate::loader::api::ComponentLoader;
use crate::registry::error::{RegistryError, RegistryResult};
use crate::registry::types::{
    ErrorCode, ExecutionContext, ExecutionError, ExecutionResult, FeatureDeclaration,
    FeatureFilter,
};
use crate::store::api::BackingStore;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Default upper bound on one feature execution
pub const DEFAULT_EXECUTE_TIMEOUT: Duration = Duration::from_secs(30);

pub struct FeatureRegistry {
    store: Arc<dyn BackingStore>,
    loader: Arc<ComponentLoader>,
    events: Arc<EventBus>,
    execute_timeout: Duration,
}

impl FeatureRegistry {
    pub fn new(
        store: Arc<dyn BackingStore>,
        loader: Arc<ComponentLoader>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            store,
            loader,
            events,
            execute_timeout: DEFAULT_EXECUTE_TIMEOUT,
        }
    }

    /// Override the per-execution timeout
    pub fn with_execute_timeout(mut self, timeout: Duration) -> Self {
        self.execute_timeout = timeout;
        self
    }

    /// Insert or replace a declaration, keyed by feature id
    ///
    /// Registering the same id twice replaces the prior content without
    /// creating a duplicate. The update timestamp is stamped here.
    pub async fn register_feature(
        &self,
        mut declaration: FeatureDeclaration,
    ) -> RegistryResult<()> {
        declaration.updated_at = chrono::Utc::now();
        let feature_id = declaration.feature_id.clone();
        self.store.upsert_feature(declaration).await?;
        log::debug!("Registered feature '{}'", feature_id);
        Ok(())
    }

    /// Soft-deactivate a declaration and tear down its runtime footprint
    ///
    /// The stored row is retained for audit history. Cached
    /// implementations for the feature's declared locators are evicted
    /// and every subscription the feature owns is removed.
    pub async fn unregister_feature(&self, feature_id: &str) -> RegistryResult<()> {
        let declaration = self.store.fetch_feature(feature_id).await?.ok_or_else(|| {
            RegistryError::FeatureNotFound {
                feature_id: feature_id.to_string(),
            }
        })?;

        self.store.set_feature_active(feature_id, false).await?;

        if let Some(locator) = &declaration.component_locator {
            self.loader.evict(locator).await;
        }
        if let Some(locator) = &declaration.service_locator {
            self.loader.evict(locator).await;
        }

        let removed = self.events.unsubscribe_feature(feature_id).await;
        log::info!(
            "Unregistered feature '{}' ({} subscriptions removed)",
            feature_id,
            removed
        );
        Ok(())
    }

    /// Fetch one active declaration; None when absent or soft-deleted
    pub async fn get_feature(
        &self,
        feature_id: &str,
    ) -> RegistryResult<Option<FeatureDeclaration>> {
        let declaration = self.store.fetch_feature(feature_id).await?;
        Ok(declaration.filter(|d| d.is_active))
    }

    /// List active declarations matching the filter
    pub async fn list_features(
        &self,
        filter: &FeatureFilter,
    ) -> RegistryResult<Vec<FeatureDeclaration>> {
        let declarations = self.store.fetch_features().await?;
        Ok(declarations
            .into_iter()
            .filter(|d| d.is_active && filter.matches(d))
            .collect())
    }

    /// Execute a feature end to end
    ///
    /// Pipeline: resolve the declaration, load its service through the
    /// loader (fallback stand-in on load failure), validate the input
    /// against the service's contract, then execute with a timeout and
    /// measure elapsed time. Validation failure short-circuits before
    /// `execute` is invoked and is not billed execution time.
    pub async fn execute_feature(
        &self,
        feature_id: &str,
        input: Value,
        context: ExecutionContext,
    ) -> ExecutionResult {
        let declaration = match self.store.fetch_feature(feature_id).await {
            Ok(Some(declaration)) if declaration.is_active => declaration,
            Ok(_) => {
                return ExecutionResult::failed(
                    ErrorCode::FeatureNotFound,
                    format!("Feature '{}' is not registered or inactive", feature_id),
                    true,
                );
            }
            Err(err) => {
                log::error!("Store lookup failed for feature '{}': {}", feature_id, err);
                return ExecutionResult::failed(
                    ErrorCode::ExecutionError,
                    format!("Failed to resolve feature '{}': {}", feature_id, err),
                    false,
                );
            }
        };

        let locator = match &declaration.service_locator {
            Some(locator) => locator.clone(),
            None => {
                return ExecutionResult::failed(
                    ErrorCode::ServiceNotFound,
                    format!("Feature '{}' declares no service interface", feature_id),
                    true,
                );
            }
        };

        let service = self.loader.load_service(&locator).await;
        if service.metadata().is_error_placeholder {
            return ExecutionResult::failed(
                ErrorCode::ServiceLoadError,
                format!("Service '{}' failed to load", locator),
                false,
            );
        }

        let validation = service.validate(&input);
        if !validation.valid {
            let errors = validation
                .errors
                .into_iter()
                .map(|field_error| {
                    ExecutionError::new(
                        ErrorCode::ValidationError,
                        format!("{}: {}", field_error.field, field_error.message),
                        true,
                    )
                })
                .collect();
            return ExecutionResult::failed_with(errors);
        }

        let started = std::time::Instant::now();
        let mut task = {
            let service = service.clone();
            let context = context.clone();
            // Spawned so a panicking service is contained like any other failure
            tokio::spawn(async move { service.execute(&input, &context).await })
        };

        let result = match tokio::time::timeout(self.execute_timeout, &mut task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => {
                log::error!("Feature '{}' execution panicked: {}", feature_id, join_err);
                ExecutionResult::failed(
                    ErrorCode::ExecutionError,
                    format!("Feature '{}' execution failed: {}", feature_id, join_err),
                    false,
                )
            }
            Err(_) => {
                // Stop the still-running service task instead of leaking it
                task.abort();
                log::warn!(
                    "Feature '{}' timed out after {:?}",
                    feature_id,
                    self.execute_timeout
                );
                ExecutionResult::failed(
                    ErrorCode::ExecutionTimeout,
                    format!(
                        "Feature '{}' did not complete within {:?}",
                        feature_id, self.execute_timeout
                    ),
                    true,
                )
            }
        };

        result.with_execution_time(started.elapsed())
    }
}
