//! Subscription registry: the topic ↔ connection relation.
//!
//! [`SubscriptionRegistry`] owns both sides of the relation (topic → set of
//! connections, connection → set of topics) behind one exclusive lock.
//! Subscribe/unsubscribe and broadcast iteration take the same lock, so a
//! broadcast never observes a half-applied mutation.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::sink::ResponseSink;
use crate::domain::ConnectionId;
use crate::protocol::Frame;

/// Shared registry of connection subscriptions.
///
/// # Invariants
///
/// - A topic key exists iff at least one connection subscribes to it.
/// - `c ∈ by_topic[t]` iff `t ∈ by_connection[c].topics`.
///
/// # Concurrency
///
/// Every method holds the lock for a single insert, remove, or iteration.
/// Nothing awaits while the lock is held.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    inner: Mutex<Relation>,
}

#[derive(Debug, Default)]
struct Relation {
    by_topic: HashMap<String, HashSet<ConnectionId>>,
    by_connection: HashMap<ConnectionId, ConnectionEntry>,
}

#[derive(Debug, Default)]
struct ConnectionEntry {
    topics: HashSet<String>,
    /// `None` for connections that subscribed without registering a sink;
    /// they are tracked but never receive broadcasts.
    outbound: Option<ResponseSink>,
}

impl SubscriptionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Relation> {
        // Every mutation leaves the relation consistent before it can panic,
        // so a poisoned lock still guards valid data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a connection and its outbound sink with no topics.
    ///
    /// Re-registering replaces the sink and keeps existing topics.
    pub fn register(&self, sink: ResponseSink) {
        let id = sink.connection();
        self.lock().by_connection.entry(id).or_default().outbound = Some(sink);
        tracing::debug!(conn_id = %id, "connection registered");
    }

    /// Removes a connection and all of its subscriptions.
    ///
    /// Returns the number of topics the connection was subscribed to.
    pub fn unregister(&self, id: ConnectionId) -> usize {
        let mut rel = self.lock();
        let Some(entry) = rel.by_connection.remove(&id) else {
            return 0;
        };
        for topic in &entry.topics {
            rel.detach(topic, id);
        }
        entry.topics.len()
    }

    /// Subscribes `id` to `topic`. Returns `true` if it was not already
    /// subscribed.
    pub fn subscribe(&self, id: ConnectionId, topic: &str) -> bool {
        let mut rel = self.lock();
        let added = rel
            .by_connection
            .entry(id)
            .or_default()
            .topics
            .insert(topic.to_string());
        if added {
            rel.by_topic.entry(topic.to_string()).or_default().insert(id);
        }
        added
    }

    /// Unsubscribes `id` from `topic`. Returns `true` if it was subscribed.
    pub fn unsubscribe(&self, id: ConnectionId, topic: &str) -> bool {
        let mut rel = self.lock();
        let removed = rel
            .by_connection
            .get_mut(&id)
            .is_some_and(|entry| entry.topics.remove(topic));
        if removed {
            rel.detach(topic, id);
        }
        removed
    }

    /// Returns the topics `id` is subscribed to, sorted.
    #[must_use]
    pub fn topics_of(&self, id: ConnectionId) -> Vec<String> {
        let mut topics: Vec<String> = self
            .lock()
            .by_connection
            .get(&id)
            .map(|entry| entry.topics.iter().cloned().collect())
            .unwrap_or_default();
        topics.sort_unstable();
        topics
    }

    /// Returns the connections subscribed to `topic`, sorted.
    #[must_use]
    pub fn subscribers_of(&self, topic: &str) -> Vec<ConnectionId> {
        let mut subs: Vec<ConnectionId> = self
            .lock()
            .by_topic
            .get(topic)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        subs.sort_unstable();
        subs
    }

    /// Returns the number of known connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.lock().by_connection.len()
    }

    /// Returns the number of topics with at least one subscriber.
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.lock().by_topic.len()
    }

    /// Queues `frame` to every subscriber of `topic`.
    ///
    /// The frame is encoded once, outside the lock. Returns the number of
    /// connections it was queued to.
    pub fn publish(&self, topic: &str, frame: &Frame) -> usize {
        let text = match frame.encode() {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(topic, %err, "failed to encode broadcast frame");
                return 0;
            }
        };
        let rel = self.lock();
        let Some(subs) = rel.by_topic.get(topic) else {
            return 0;
        };
        subs.iter()
            .filter_map(|id| rel.by_connection.get(id)?.outbound.as_ref())
            .filter(|sink| sink.send_encoded(text.clone()))
            .count()
    }

    #[cfg(test)]
    fn is_consistent(&self) -> bool {
        let rel = self.lock();
        let forward = rel.by_topic.iter().all(|(topic, subs)| {
            !subs.is_empty()
                && subs.iter().all(|id| {
                    rel.by_connection
                        .get(id)
                        .is_some_and(|entry| entry.topics.contains(topic))
                })
        });
        let backward = rel.by_connection.iter().all(|(id, entry)| {
            entry
                .topics
                .iter()
                .all(|topic| rel.by_topic.get(topic).is_some_and(|subs| subs.contains(id)))
        });
        forward && backward
    }
}

impl Relation {
    fn detach(&mut self, topic: &str, id: ConnectionId) {
        if let Some(subs) = self.by_topic.get_mut(topic) {
            subs.remove(&id);
            if subs.is_empty() {
                self.by_topic.remove(topic);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc::Receiver;

    fn registered(registry: &SubscriptionRegistry) -> (ConnectionId, Receiver<String>) {
        let id = ConnectionId::new();
        let (sink, rx) = ResponseSink::channel(id, 8);
        registry.register(sink);
        (id, rx)
    }

    #[test]
    fn empty_registry_has_nothing() {
        let registry = SubscriptionRegistry::new();
        assert_eq!(registry.connection_count(), 0);
        assert_eq!(registry.topic_count(), 0);
        assert!(registry.subscribers_of("a").is_empty());
    }

    #[test]
    fn subscribe_is_idempotent() {
        let registry = SubscriptionRegistry::new();
        let (id, _rx) = registered(&registry);
        assert!(registry.subscribe(id, "agent-1"));
        assert!(!registry.subscribe(id, "agent-1"));
        assert_eq!(registry.topics_of(id), ["agent-1"]);
        assert_eq!(registry.subscribers_of("agent-1"), [id]);
        assert!(registry.is_consistent());
    }

    #[test]
    fn unsubscribe_absent_topic_changes_nothing() {
        let registry = SubscriptionRegistry::new();
        let (id, _rx) = registered(&registry);
        registry.subscribe(id, "keep");
        assert!(!registry.unsubscribe(id, "never-subscribed"));
        assert!(!registry.unsubscribe(ConnectionId::new(), "keep"));
        assert_eq!(registry.topics_of(id), ["keep"]);
        assert!(registry.is_consistent());
    }

    #[test]
    fn last_unsubscribe_drops_topic_key() {
        let registry = SubscriptionRegistry::new();
        let (a, _rx_a) = registered(&registry);
        let (b, _rx_b) = registered(&registry);
        registry.subscribe(a, "t");
        registry.subscribe(b, "t");
        assert!(registry.unsubscribe(a, "t"));
        assert_eq!(registry.topic_count(), 1);
        assert!(registry.unsubscribe(b, "t"));
        assert_eq!(registry.topic_count(), 0);
        assert!(registry.is_consistent());
    }

    #[test]
    fn operations_apply_in_order() {
        let registry = SubscriptionRegistry::new();
        let (id, _rx) = registered(&registry);
        registry.subscribe(id, "t");
        registry.unsubscribe(id, "t");
        registry.subscribe(id, "t");
        registry.subscribe(id, "t");
        assert_eq!(registry.topics_of(id), ["t"]);
        registry.unsubscribe(id, "t");
        registry.unsubscribe(id, "t");
        assert!(registry.topics_of(id).is_empty());
        assert!(registry.subscribers_of("t").is_empty());
        assert!(registry.is_consistent());
    }

    #[test]
    fn unregister_drops_all_topics() {
        let registry = SubscriptionRegistry::new();
        let (a, _rx_a) = registered(&registry);
        let (b, _rx_b) = registered(&registry);
        registry.subscribe(a, "x");
        registry.subscribe(a, "y");
        registry.subscribe(b, "y");
        assert_eq!(registry.unregister(a), 2);
        assert_eq!(registry.unregister(a), 0);
        assert_eq!(registry.connection_count(), 1);
        assert_eq!(registry.subscribers_of("y"), [b]);
        assert!(registry.subscribers_of("x").is_empty());
        assert!(registry.is_consistent());
    }

    #[test]
    fn publish_reaches_only_topic_subscribers() {
        let registry = SubscriptionRegistry::new();
        let (a, mut rx_a) = registered(&registry);
        let (_b, mut rx_b) = registered(&registry);
        registry.subscribe(a, "agent-1");

        let frame = Frame::event("agent_status_update", json!({"status": "started"}));
        assert_eq!(registry.publish("agent-1", &frame), 1);
        assert_eq!(registry.publish("agent-2", &frame), 0);

        let Ok(text) = rx_a.try_recv() else {
            panic!("subscriber should receive frame");
        };
        assert!(text.contains("agent_status_update"));
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn unregistered_subscriber_is_tracked_but_not_delivered() {
        let registry = SubscriptionRegistry::new();
        let id = ConnectionId::new();
        assert!(registry.subscribe(id, "t"));
        assert_eq!(registry.subscribers_of("t"), [id]);
        assert_eq!(registry.publish("t", &Frame::error(400, "x")), 0);
    }

    #[tokio::test]
    async fn concurrent_mutation_keeps_relation_consistent() {
        let registry = std::sync::Arc::new(SubscriptionRegistry::new());
        let mut tasks = Vec::new();
        for n in 0..8 {
            let registry = std::sync::Arc::clone(&registry);
            tasks.push(tokio::spawn(async move {
                let id = ConnectionId::new();
                for i in 0..50 {
                    let topic = format!("topic-{}", (i + n) % 5);
                    registry.subscribe(id, &topic);
                    if i % 3 == 0 {
                        registry.unsubscribe(id, &topic);
                    }
                    registry.publish(&topic, &Frame::error(400, "noise"));
                }
                if n % 2 == 0 {
                    registry.unregister(id);
                }
            }));
        }
        for task in tasks {
            let Ok(()) = task.await else {
                panic!("task failed");
            };
        }
        assert!(registry.is_consistent());
        assert_eq!(registry.connection_count(), 4);
    }
}
