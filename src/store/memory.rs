//! In-memory backing store
//!
//! Reference implementation of `BackingStore` used by tests and by hosts
//! whose persistence lives elsewhere. Module rows are seeded by the host
//! since the real system modules table is externally owned.

use crate::events::types::EventDescriptor;
use crate::module::types::ModuleDeclaration;
use crate::registry::types::FeatureDeclaration;
use crate::store::error::StoreResult;
use crate::store::traits::BackingStore;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    features: RwLock<HashMap<String, FeatureDeclaration>>,
    modules: RwLock<Vec<ModuleDeclaration>>,
    catalogue: RwLock<HashMap<(String, String), EventDescriptor>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a module row, replacing any prior row with the same id
    pub async fn seed_module(&self, declaration: ModuleDeclaration) {
        let mut modules = self.modules.write().await;
        modules.retain(|m| m.module_id != declaration.module_id);
        modules.push(declaration);
    }
}

#[async_trait::async_trait]
impl BackingStore for MemoryStore {
    async fn upsert_feature(&self, declaration: FeatureDeclaration) -> StoreResult<()> {
        let mut features = self.features.write().await;
        features.insert(declaration.feature_id.clone(), declaration);
        Ok(())
    }

    async fn fetch_feature(&self, feature_id: &str) -> StoreResult<Option<FeatureDeclaration>> {
        let features = self.features.read().await;
        Ok(features.get(feature_id).cloned())
    }

    async fn fetch_features(&self) -> StoreResult<Vec<FeatureDeclaration>> {
        let features = self.features.read().await;
        let mut rows: Vec<_> = features.values().cloned().collect();
        rows.sort_by(|a, b| a.feature_id.cmp(&b.feature_id));
        Ok(rows)
    }

    async fn set_feature_active(&self, feature_id: &str, active: bool) -> StoreResult<bool> {
        let mut features = self.features.write().await;
        match features.get_mut(feature_id) {
            Some(declaration) => {
                declaration.is_active = active;
                declaration.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_active_modules(&self) -> StoreResult<Vec<ModuleDeclaration>> {
        let modules = self.modules.read().await;
        Ok(modules.iter().filter(|m| m.is_active).cloned().collect())
    }

    async fn upsert_event_descriptor(&self, descriptor: EventDescriptor) -> StoreResult<()> {
        let mut catalogue = self.catalogue.write().await;
        let key = (descriptor.feature_id.clone(), descriptor.event_name.clone());
        catalogue.insert(key, descriptor);
        Ok(())
    }

    async fn list_event_descriptors(
        &self,
        feature_id: Option<&str>,
    ) -> StoreResult<Vec<EventDescriptor>> {
        let catalogue = self.catalogue.read().await;
        let mut descriptors: Vec<_> = catalogue
            .values()
            .filter(|d| feature_id.map_or(true, |id| d.feature_id == id))
            .cloned()
            .collect();
        descriptors.sort_by(|a, b| {
            (a.feature_id.as_str(), a.event_name.as_str())
                .cmp(&(b.feature_id.as_str(), b.event_name.as_str()))
        });
        Ok(descriptors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_feature_upsert_replaces_by_id() {
        let store = MemoryStore::new();

        let mut declaration = FeatureDeclaration::new("export", "Export v1");
        store.upsert_feature(declaration.clone()).await.unwrap();

        declaration.name = "Export v2".to_string();
        store.upsert_feature(declaration).await.unwrap();

        let rows = store.fetch_features().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Export v2");
    }

    #[tokio::test]
    async fn test_soft_delete_keeps_row() {
        let store = MemoryStore::new();
        store
            .upsert_feature(FeatureDeclaration::new("export", "Export"))
            .await
            .unwrap();

        assert!(store.set_feature_active("export", false).await.unwrap());

        let row = store.fetch_feature("export").await.unwrap().unwrap();
        assert!(!row.is_active);

        assert!(!store.set_feature_active("missing", false).await.unwrap());
    }

    #[tokio::test]
    async fn test_only_active_modules_are_listed() {
        let store = MemoryStore::new();
        store
            .seed_module(ModuleDeclaration::new("candidates", "Candidates"))
            .await;

        let mut inactive = ModuleDeclaration::new("legacy", "Legacy");
        inactive.is_active = false;
        store.seed_module(inactive).await;

        let modules = store.list_active_modules().await.unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].module_id, "candidates");
    }

    #[tokio::test]
    async fn test_event_catalogue_upserts_on_composite_key() {
        let store = MemoryStore::new();
        store
            .upsert_event_descriptor(EventDescriptor {
                feature_id: "export".to_string(),
                event_name: "export:started".to_string(),
                description: "old".to_string(),
            })
            .await
            .unwrap();
        store
            .upsert_event_descriptor(EventDescriptor {
                feature_id: "export".to_string(),
                event_name: "export:started".to_string(),
                description: "new".to_string(),
            })
            .await
            .unwrap();
        store
            .upsert_event_descriptor(EventDescriptor {
                feature_id: "import".to_string(),
                event_name: "import:started".to_string(),
                description: "import".to_string(),
            })
            .await
            .unwrap();

        let all = store.list_event_descriptors(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let export_only = store.list_event_descriptors(Some("export")).await.unwrap();
        assert_eq!(export_only.len(), 1);
        assert_eq!(export_only[0].description, "new");
    }
}
