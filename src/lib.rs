//! plugboard - dynamic feature/module plugin runtime
//!
//! A registry that lets a host application declare "features" and "modules"
//! as data rather than compiled-in code, load their implementations on
//! demand, validate them, and let them communicate without direct references
//! to one another via a pattern-matched event bus.

pub mod core;
pub mod events;
pub mod loader;
pub mod module;
pub mod registry;
pub mod runtime;
pub mod store;

pub use crate::runtime::{PluginRuntime, RuntimeConfig};
