//! Event bus implementation
//!
//! Decouples producers and consumers of domain events. Subscriptions are
//! pattern-matched against emitted event names; dispatch fans out to every
//! matching handler concurrently and settles only after all of them finish.
//! Handler failures are isolated per subscription: they are counted,
//! logged, and audit-recorded, but never fail the emit or sibling handlers.
//!
//! Subscriptions and history are process-lifetime only. The persisted
//! event catalogue is documentation for discoverability; dispatch never
//! consults it.

use crate::core::pattern::{EventPattern, PatternError};
use crate::events::error::HandlerError;
use crate::events::traits::{AuditEntry, AuditOutcome, AuditSink, EventHandler, LogAuditSink};
use crate::events::types::{
    DispatchSummary, EventDescriptor, EventRecord, SubscriptionId, SubscriptionStats,
    EVENT_HISTORY_LIMIT,
};
use crate::registry::types::ExecutionContext;
use crate::store::api::{BackingStore, StoreResult};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Tunables for dispatch behaviour
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Upper bound on a single handler invocation; a handler still running
    /// when it elapses is counted as failed
    pub handler_timeout: Duration,
    /// History ring capacity
    pub history_limit: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            handler_timeout: Duration::from_secs(10),
            history_limit: EVENT_HISTORY_LIMIT,
        }
    }
}

struct Subscription {
    pattern: EventPattern,
    handler: Arc<dyn EventHandler>,
    feature_id: Option<String>,
    #[allow(dead_code)]
    context: Option<ExecutionContext>,
}

pub struct EventBus {
    store: Arc<dyn BackingStore>,
    audit: Arc<dyn AuditSink>,
    config: EventBusConfig,
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
    history: RwLock<VecDeque<EventRecord>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new(store: Arc<dyn BackingStore>) -> Self {
        Self {
            store,
            audit: Arc::new(LogAuditSink),
            config: EventBusConfig::default(),
            subscriptions: RwLock::new(HashMap::new()),
            history: RwLock::new(VecDeque::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Replace the audit side-channel
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = sink;
        self
    }

    /// Override dispatch tunables
    pub fn with_config(mut self, config: EventBusConfig) -> Self {
        self.config = config;
        self
    }

    /// Subscribe a handler to a pattern
    pub async fn subscribe(
        &self,
        pattern: &str,
        handler: Arc<dyn EventHandler>,
    ) -> Result<SubscriptionId, PatternError> {
        self.add_subscription(pattern, handler, None, None).await
    }

    /// Subscribe a handler on behalf of a feature
    ///
    /// Tagging with the owning feature enables `unsubscribe_feature` to
    /// remove every subscription the feature created in one call, used
    /// when the feature is unregistered.
    pub async fn subscribe_for_feature(
        &self,
        feature_id: &str,
        pattern: &str,
        handler: Arc<dyn EventHandler>,
        context: Option<ExecutionContext>,
    ) -> Result<SubscriptionId, PatternError> {
        self.add_subscription(pattern, handler, Some(feature_id.to_string()), context)
            .await
    }

    async fn add_subscription(
        &self,
        pattern: &str,
        handler: Arc<dyn EventHandler>,
        feature_id: Option<String>,
        context: Option<ExecutionContext>,
    ) -> Result<SubscriptionId, PatternError> {
        let pattern = EventPattern::compile(pattern)?;
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));

        let mut subscriptions = self.subscriptions.write().await;
        subscriptions.insert(
            id,
            Subscription {
                pattern,
                handler,
                feature_id,
                context,
            },
        );
        log::debug!("Registered subscription {}", id);
        Ok(id)
    }

    /// Remove one subscription; returns false when the id is unknown
    pub async fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.subscriptions.write().await.remove(&id).is_some();
        if removed {
            log::debug!("Removed subscription {}", id);
        }
        removed
    }

    /// Remove every subscription owned by a feature; returns the count removed
    pub async fn unsubscribe_feature(&self, feature_id: &str) -> usize {
        let mut subscriptions = self.subscriptions.write().await;
        let before = subscriptions.len();
        subscriptions.retain(|_, sub| sub.feature_id.as_deref() != Some(feature_id));
        let removed = before - subscriptions.len();
        if removed > 0 {
            log::debug!(
                "Removed {} subscriptions owned by feature '{}'",
                removed,
                feature_id
            );
        }
        removed
    }

    /// Emit an event: record it, fan out to all matching handlers, and
    /// settle once every handler has finished
    ///
    /// Handlers run concurrently; ordering between them is unspecified.
    /// A failing, panicking or timed-out handler is reflected in the
    /// returned summary and the audit log without affecting its siblings.
    pub async fn emit(
        &self,
        event_name: &str,
        payload: Value,
        context: Option<ExecutionContext>,
    ) -> DispatchSummary {
        let record = EventRecord::new(event_name, payload, context);
        self.record_history(record.clone()).await;

        let matching: Vec<(SubscriptionId, Option<String>, Arc<dyn EventHandler>)> = {
            let subscriptions = self.subscriptions.read().await;
            subscriptions
                .iter()
                .filter(|(_, sub)| sub.pattern.matches(event_name))
                .map(|(id, sub)| (*id, sub.feature_id.clone(), sub.handler.clone()))
                .collect()
        };

        let mut summary = DispatchSummary {
            matched: matching.len(),
            ..Default::default()
        };
        if matching.is_empty() {
            return summary;
        }

        let timeout = self.config.handler_timeout;
        let tasks: Vec<_> = matching
            .iter()
            .map(|(_, _, handler)| {
                let handler = handler.clone();
                let record = record.clone();
                tokio::spawn(async move {
                    match tokio::time::timeout(timeout, handler.handle(&record)).await {
                        Ok(outcome) => outcome,
                        Err(_) => Err(HandlerError::TimedOut { timeout }),
                    }
                })
            })
            .collect();

        let settled = futures::future::join_all(tasks).await;

        for ((id, feature_id, _), joined) in matching.into_iter().zip(settled) {
            // Spawned task isolation also contains a panicking handler
            let outcome = match joined {
                Ok(Ok(())) => {
                    summary.succeeded += 1;
                    AuditOutcome::Delivered
                }
                Ok(Err(err)) => {
                    summary.failed += 1;
                    log::warn!("Handler {} failed for '{}': {}", id, event_name, err);
                    AuditOutcome::Failed(err.to_string())
                }
                Err(join_err) => {
                    summary.failed += 1;
                    let err = HandlerError::Panicked {
                        message: join_err.to_string(),
                    };
                    log::error!("Handler {} panicked for '{}': {}", id, event_name, err);
                    AuditOutcome::Failed(err.to_string())
                }
            };

            self.audit
                .record(AuditEntry {
                    event_name: event_name.to_string(),
                    subscription_id: id,
                    feature_id,
                    outcome,
                    timestamp: chrono::Utc::now(),
                })
                .await;
        }

        summary
    }

    async fn record_history(&self, record: EventRecord) {
        // A limit of 0 disables history entirely
        if self.config.history_limit == 0 {
            return;
        }
        let mut history = self.history.write().await;
        while history.len() >= self.config.history_limit {
            history.pop_front();
        }
        history.push_back(record);
    }

    /// Catalogue an event name for discoverability
    pub async fn register_event(&self, descriptor: EventDescriptor) -> StoreResult<()> {
        self.store.upsert_event_descriptor(descriptor).await
    }

    /// List catalogued event names, optionally for one feature
    pub async fn list_events(&self, feature_id: Option<&str>) -> StoreResult<Vec<EventDescriptor>> {
        self.store.list_event_descriptors(feature_id).await
    }

    /// The most recent `limit` history entries, oldest first, optionally
    /// restricted to one event name
    pub async fn event_history(&self, event_name: Option<&str>, limit: usize) -> Vec<EventRecord> {
        let history = self.history.read().await;
        let filtered: Vec<_> = history
            .iter()
            .filter(|record| event_name.map_or(true, |name| record.event_name == name))
            .cloned()
            .collect();
        let skip = filtered.len().saturating_sub(limit);
        filtered.into_iter().skip(skip).collect()
    }

    /// Live subscription table introspection
    pub async fn subscription_stats(&self) -> SubscriptionStats {
        let subscriptions = self.subscriptions.read().await;
        let mut patterns: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_feature: BTreeMap<String, usize> = BTreeMap::new();

        for sub in subscriptions.values() {
            *patterns.entry(sub.pattern.as_str().to_string()).or_insert(0) += 1;
            if let Some(feature_id) = &sub.feature_id {
                *by_feature.entry(feature_id.clone()).or_insert(0) += 1;
            }
        }

        SubscriptionStats {
            total_subscriptions: subscriptions.len(),
            patterns: patterns.into_iter().collect(),
            by_feature: by_feature.into_iter().collect(),
        }
    }

    /// Drop every live subscription (testing/ops aid)
    pub async fn clear_all_subscriptions(&self) {
        self.subscriptions.write().await.clear();
    }

    /// Drop the history ring (testing/ops aid)
    pub async fn clear_event_history(&self) {
        self.history.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::traits::{handler_fn, CollectingAuditSink};
    use crate::store::api::MemoryStore;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    fn bus() -> EventBus {
        EventBus::new(Arc::new(MemoryStore::new()))
    }

    fn counting_handler(counter: Arc<AtomicUsize>) -> Arc<dyn EventHandler> {
        handler_fn(move |_event| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
    }

    #[tokio::test]
    async fn test_pattern_subscription_matches_prefix_wildcard() {
        let bus = bus();
        let counter = Arc::new(AtomicUsize::new(0));
        bus.subscribe("order:*", counting_handler(counter.clone()))
            .await
            .unwrap();

        let summary = bus.emit("order:created", json!({"id": 1}), None).await;
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.succeeded, 1);

        let summary = bus.emit("invoice:created", json!({"id": 2}), None).await;
        assert_eq!(summary.matched, 0);

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exact_subscription_does_not_match_longer_name() {
        let bus = bus();
        let counter = Arc::new(AtomicUsize::new(0));
        bus.subscribe("x", counting_handler(counter.clone()))
            .await
            .unwrap();

        bus.emit("xy", json!(null), None).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        bus.emit("x", json!(null), None).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_pattern_is_rejected() {
        let bus = bus();
        // Exercises the compile path; all glob inputs are escapable, so
        // compilation only fails on pathological regex size limits.
        let id = bus
            .subscribe("order:*", handler_fn(|_| async { Ok(()) }))
            .await
            .unwrap();
        assert!(bus.unsubscribe(id).await);
        assert!(!bus.unsubscribe(id).await);
    }

    #[tokio::test]
    async fn test_failing_handler_does_not_affect_sibling() {
        let bus = bus();
        let counter = Arc::new(AtomicUsize::new(0));

        bus.subscribe(
            "order:*",
            handler_fn(|_| async { Err(HandlerError::failed("boom")) }),
        )
        .await
        .unwrap();
        bus.subscribe("order:*", counting_handler(counter.clone()))
            .await
            .unwrap();

        let summary = bus.emit("order:created", json!({}), None).await;
        assert_eq!(summary.matched, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panicking_handler_is_contained() {
        let bus = bus();
        let counter = Arc::new(AtomicUsize::new(0));

        bus.subscribe(
            "order:*",
            handler_fn(|_| async { panic!("handler exploded") }),
        )
        .await
        .unwrap();
        bus.subscribe("order:*", counting_handler(counter.clone()))
            .await
            .unwrap();

        let summary = bus.emit("order:created", json!({}), None).await;
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_slow_handler_times_out() {
        let bus = bus().with_config(EventBusConfig {
            handler_timeout: Duration::from_millis(20),
            ..Default::default()
        });

        bus.subscribe(
            "slow",
            handler_fn(|_| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            }),
        )
        .await
        .unwrap();

        let summary = bus.emit("slow", json!({}), None).await;
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.failed, 1);
    }

    #[tokio::test]
    async fn test_history_is_bounded_fifo() {
        let bus = bus();
        for i in 0..1050 {
            bus.emit(&format!("event-{}", i), json!(i), None).await;
        }

        let history = bus.event_history(None, usize::MAX).await;
        assert_eq!(history.len(), EVENT_HISTORY_LIMIT);
        assert_eq!(history.first().unwrap().event_name, "event-50");
        assert_eq!(history.last().unwrap().event_name, "event-1049");
    }

    #[tokio::test]
    async fn test_zero_history_limit_disables_recording() {
        let bus = bus().with_config(EventBusConfig {
            history_limit: 0,
            ..Default::default()
        });
        let counter = Arc::new(AtomicUsize::new(0));
        bus.subscribe("order:*", counting_handler(counter.clone()))
            .await
            .unwrap();

        // Dispatch must complete normally; nothing is retained
        let summary = bus.emit("order:created", json!({}), None).await;
        assert_eq!(summary.succeeded, 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(bus.event_history(None, usize::MAX).await.is_empty());
    }

    #[tokio::test]
    async fn test_history_filtering_and_limit() {
        let bus = bus();
        bus.emit("a", json!(1), None).await;
        bus.emit("b", json!(2), None).await;
        bus.emit("a", json!(3), None).await;

        let only_a = bus.event_history(Some("a"), 10).await;
        assert_eq!(only_a.len(), 2);
        assert_eq!(only_a[1].payload, json!(3));

        let last_two = bus.event_history(None, 2).await;
        assert_eq!(last_two.len(), 2);
        assert_eq!(last_two[0].event_name, "b");

        bus.clear_event_history().await;
        assert!(bus.event_history(None, 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_unsubscribe_feature_removes_all_of_its_subscriptions() {
        let bus = bus();
        let counter = Arc::new(AtomicUsize::new(0));

        bus.subscribe_for_feature(
            "export",
            "order:*",
            counting_handler(counter.clone()),
            Some(ExecutionContext::for_feature("export")),
        )
        .await
        .unwrap();
        bus.subscribe_for_feature("export", "invoice:*", counting_handler(counter.clone()), None)
            .await
            .unwrap();
        bus.subscribe("order:*", counting_handler(counter.clone()))
            .await
            .unwrap();

        assert_eq!(bus.unsubscribe_feature("export").await, 2);

        bus.emit("order:created", json!({}), None).await;
        bus.emit("invoice:created", json!({}), None).await;
        // Only the unowned subscription remains
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_subscription_stats() {
        let bus = bus();
        bus.subscribe("order:*", handler_fn(|_| async { Ok(()) }))
            .await
            .unwrap();
        bus.subscribe("order:*", handler_fn(|_| async { Ok(()) }))
            .await
            .unwrap();
        bus.subscribe_for_feature("export", "invoice:*", handler_fn(|_| async { Ok(()) }), None)
            .await
            .unwrap();

        let stats = bus.subscription_stats().await;
        assert_eq!(stats.total_subscriptions, 3);
        assert!(stats.patterns.contains(&("order:*".to_string(), 2)));
        assert_eq!(stats.by_feature, vec![("export".to_string(), 1)]);

        bus.clear_all_subscriptions().await;
        assert_eq!(bus.subscription_stats().await.total_subscriptions, 0);
    }

    #[tokio::test]
    async fn test_audit_sink_records_each_handler_outcome() {
        let sink = Arc::new(CollectingAuditSink::new());
        let bus = EventBus::new(Arc::new(MemoryStore::new())).with_audit_sink(sink.clone());

        bus.subscribe("order:*", handler_fn(|_| async { Ok(()) }))
            .await
            .unwrap();
        bus.subscribe_for_feature(
            "export",
            "order:*",
            handler_fn(|_| async { Err(HandlerError::failed("nope")) }),
            None,
        )
        .await
        .unwrap();

        bus.emit("order:created", json!({}), None).await;

        let entries = sink.entries().await;
        assert_eq!(entries.len(), 2);

        let delivered: Vec<_> = entries
            .iter()
            .filter(|e| e.outcome == AuditOutcome::Delivered)
            .collect();
        assert_eq!(delivered.len(), 1);

        let failed: Vec<_> = entries
            .iter()
            .filter(|e| matches!(e.outcome, AuditOutcome::Failed(_)))
            .collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].feature_id.as_deref(), Some("export"));
    }

    #[tokio::test]
    async fn test_event_catalogue_round_trip() {
        let bus = bus();
        bus.register_event(EventDescriptor {
            feature_id: "export".to_string(),
            event_name: "export:done".to_string(),
            description: "Export finished".to_string(),
        })
        .await
        .unwrap();

        let events = bus.list_events(Some("export")).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_name, "export:done");
        assert!(bus.list_events(Some("other")).await.unwrap().is_empty());
    }
}
