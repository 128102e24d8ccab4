//! Traits for the event bus
//!
//! Handlers and the audit side-channel are both trait seams so tests can
//! assert on them deterministically instead of scraping console output.

use crate::events::error::HandlerError;
use crate::events::types::{EventRecord, SubscriptionId};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A subscribed event handler
#[async_trait::async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &EventRecord) -> Result<(), HandlerError>;
}

/// Adapter turning an async closure into an `EventHandler`
pub struct FnHandler<F> {
    function: F,
}

#[async_trait::async_trait]
impl<F, Fut> EventHandler for FnHandler<F>
where
    F: Fn(EventRecord) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), HandlerError>> + Send,
{
    async fn handle(&self, event: &EventRecord) -> Result<(), HandlerError> {
        (self.function)(event.clone()).await
    }
}

/// Wrap an async closure as a shareable handler
pub fn handler_fn<F, Fut>(function: F) -> Arc<dyn EventHandler>
where
    F: Fn(EventRecord) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    Arc::new(FnHandler { function })
}

/// Outcome of one handler invocation, as recorded by the audit sink
#[derive(Debug, Clone, PartialEq)]
pub enum AuditOutcome {
    Delivered,
    Failed(String),
}

/// One audit record per handler invocation during a dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub event_name: String,
    pub subscription_id: SubscriptionId,
    pub feature_id: Option<String>,
    pub outcome: AuditOutcome,
    pub timestamp: DateTime<Utc>,
}

/// Side-channel receiving one entry per handler invocation
///
/// Recording is best-effort from the bus's point of view: a sink cannot
/// fail a dispatch.
#[async_trait::async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: AuditEntry);
}

/// Default sink that writes audit entries to the log
pub struct LogAuditSink;

#[async_trait::async_trait]
impl AuditSink for LogAuditSink {
    async fn record(&self, entry: AuditEntry) {
        match &entry.outcome {
            AuditOutcome::Delivered => log::trace!(
                "Delivered '{}' to {}",
                entry.event_name,
                entry.subscription_id
            ),
            AuditOutcome::Failed(message) => log::warn!(
                "Handler {} failed for '{}': {}",
                entry.subscription_id,
                entry.event_name,
                message
            ),
        }
    }
}

/// Sink that collects entries in memory for assertions
#[derive(Default)]
pub struct CollectingAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl CollectingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl AuditSink for CollectingAuditSink {
    async fn record(&self, entry: AuditEntry) {
        self.entries.lock().await.push(entry);
    }
}
