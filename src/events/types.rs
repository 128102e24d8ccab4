//! Type definitions for the event bus

use crate::registry::types::ExecutionContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum number of entries retained in the event history ring
pub const EVENT_HISTORY_LIMIT: usize = 1000;

/// A dispatched event as recorded in the bounded history ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_name: String,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
    pub context: Option<ExecutionContext>,
}

impl EventRecord {
    pub fn new(event_name: &str, payload: Value, context: Option<ExecutionContext>) -> Self {
        Self {
            event_name: event_name.to_string(),
            payload,
            timestamp: Utc::now(),
            context,
        }
    }
}

/// Identifier handed out by `subscribe` and consumed by `unsubscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// A catalogued event name, persisted for discoverability
///
/// The catalogue is documentation, separate from the live subscription
/// table; dispatch never consults it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDescriptor {
    pub feature_id: String,
    pub event_name: String,
    pub description: String,
}

/// Settlement summary returned by `emit`
///
/// Per-handler failure is isolated: a failing handler is counted here and
/// audit-logged, but never fails the emit or its sibling handlers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchSummary {
    /// Subscriptions whose pattern matched the event name
    pub matched: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Live subscription table introspection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionStats {
    pub total_subscriptions: usize,
    /// Subscription count per pattern string
    pub patterns: Vec<(String, usize)>,
    /// Subscription count per owning feature
    pub by_feature: Vec<(String, usize)>,
}
