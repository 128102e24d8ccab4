//! Public API for the event bus
//!
//! External modules should import from here rather than directly from
//! internal modules.

// Bus and configuration
pub use crate::events::manager::{EventBus, EventBusConfig};

// Error handling
pub use crate::events::error::{HandlerError, PatternError};

// Core event types
pub use crate::events::types::{
    DispatchSummary, EventDescriptor, EventRecord, SubscriptionId, SubscriptionStats,
    EVENT_HISTORY_LIMIT,
};

// Handler and audit seams
pub use crate::events::traits::{
    handler_fn, AuditEntry, AuditOutcome, AuditSink, CollectingAuditSink, EventHandler, FnHandler,
    LogAuditSink,
};
