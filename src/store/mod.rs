//! Backing store subsystem
//!
//! Contract and reference implementation for the datastore holding feature
//! declarations, the event catalogue, and the externally-owned system
//! modules table.

// Internal modules - all access should go through the api module
pub(crate) mod error;
pub(crate) mod memory;
pub(crate) mod traits;

// Public API module - the only public interface for the store
pub mod api;
