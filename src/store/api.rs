//! Public API for the backing store
//!
//! External modules should import from here rather than directly from
//! internal modules.

pub use crate::store::error::{StoreError, StoreResult};
pub use crate::store::memory::MemoryStore;
pub use crate::store::traits::BackingStore;
