//! Dynamic loader subsystem
//!
//! Resolves logical locators to executable units (renderable components
//! and callable services) with in-memory caching and safe fallback
//! stand-ins when resolution fails.

// Internal modules - all access should go through the api module
pub(crate) mod error;
pub(crate) mod fallback;
pub(crate) mod manager;
pub(crate) mod resolver;
pub(crate) mod traits;

// Public API module - the only public interface for the loader
pub mod api;
