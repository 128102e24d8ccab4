//! Event bus subsystem
//!
//! Pattern-based publish/subscribe with fan-out dispatch, per-handler
//! failure isolation, bounded in-memory history and best-effort audit
//! logging.

// Internal modules - all access should go through the api module
pub(crate) mod error;
pub(crate) mod manager;
pub(crate) mod traits;
pub(crate) mod types;

// Public API module - the only public interface for the event bus
pub mod api;
