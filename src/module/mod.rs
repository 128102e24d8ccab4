//! Module subsystem
//!
//! Discovery, validation and in-memory registration of coarse-grained
//! deployable modules declared in the externally-owned system modules
//! table.

// Internal modules - all access should go through the api module
pub(crate) mod discovery;
pub(crate) mod error;
pub(crate) mod registry;
pub(crate) mod types;
pub(crate) mod validator;

// Public API module - the only public interface for the module subsystem
pub mod api;
