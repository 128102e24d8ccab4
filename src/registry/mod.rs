//! Feature registry subsystem
//!
//! Lifecycle and execution of fine-grained feature plugins declared in
//! the backing store.

// Internal modules - all access should go through the api module
pub(crate) mod error;
pub(crate) mod manager;
pub(crate) mod types;

// Public API module - the only public interface for the registry subsystem
pub mod api;
