//! Backing store contract
//!
//! The runtime persists feature declarations and the event catalogue, and
//! reads module declarations from an externally-owned "system modules"
//! table. Hosts implement this trait over their own datastore; the
//! in-memory implementation in `memory` serves tests and hosts that
//! persist elsewhere.

use crate::events::types::EventDescriptor;
use crate::module::types::ModuleDeclaration;
use crate::registry::types::FeatureDeclaration;
use crate::store::error::StoreResult;

#[async_trait::async_trait]
pub trait BackingStore: Send + Sync {
    /// Insert or replace a feature declaration, keyed by `feature_id`
    async fn upsert_feature(&self, declaration: FeatureDeclaration) -> StoreResult<()>;

    /// Fetch one feature row regardless of its active flag
    ///
    /// Active-flag filtering is the registry's concern; the soft-deleted
    /// row stays reachable here for audit history.
    async fn fetch_feature(&self, feature_id: &str) -> StoreResult<Option<FeatureDeclaration>>;

    /// Fetch all feature rows, active and inactive
    async fn fetch_features(&self) -> StoreResult<Vec<FeatureDeclaration>>;

    /// Flip the soft-delete flag; returns false when the row is absent
    async fn set_feature_active(&self, feature_id: &str, active: bool) -> StoreResult<bool>;

    /// Read all active module declarations from the system modules table
    ///
    /// The table is owned by an external collaborator; this crate never
    /// writes to it.
    async fn list_active_modules(&self) -> StoreResult<Vec<ModuleDeclaration>>;

    /// Insert or replace a catalogue entry, keyed by `(feature_id, event_name)`
    async fn upsert_event_descriptor(&self, descriptor: EventDescriptor) -> StoreResult<()>;

    /// List catalogue entries, optionally restricted to one feature
    async fn list_event_descriptors(
        &self,
        feature_id: Option<&str>,
    ) -> StoreResult<Vec<EventDescriptor>>;
}
