//! Pub-sub manager for registering callbacks and publishing events.

use std::collections::HashMap;

use tabwatch_proto::{ChangeEvent, Topic};

use super::subscription::{Callback, SubscriptionEntry};
use crate::error::Error;

/// Manager for topic subscriptions and synchronous event delivery.
///
/// Each topic keeps its subscriptions in registration order, and
/// [`publish`](Self::publish) calls them in that order, each to completion
/// before the next.
pub struct PubSubManager {
    /// Subscriptions keyed by topic, in registration order.
    topics: HashMap<Topic, Vec<SubscriptionEntry>>,
    /// Next subscription ID.
    next_subscription_id: u64,
}

impl PubSubManager {
    /// Create a new pub-sub manager.
    pub fn new() -> Self {
        Self {
            topics: HashMap::new(),
            next_subscription_id: 1,
        }
    }

    /// Subscribe a callback to a topic.
    ///
    /// Returns the subscription ID.
    pub fn subscribe(&mut self, topic: Topic, callback: Callback) -> u64 {
        let subscription_id = self.next_subscription_id;
        self.next_subscription_id += 1;

        self.topics
            .entry(topic)
            .or_default()
            .push(SubscriptionEntry::new(subscription_id, topic, callback));

        tracing::debug!(subscription_id, %topic, "subscription created");

        subscription_id
    }

    /// Remove a subscription.
    pub fn unsubscribe(&mut self, subscription_id: u64) -> Result<(), Error> {
        let mut removed = None;
        for entries in self.topics.values_mut() {
            if let Some(pos) = entries.iter().position(|e| e.id == subscription_id) {
                removed = Some(entries.remove(pos));
                break;
            }
        }

        let entry = removed.ok_or(Error::SubscriptionNotFound(subscription_id))?;

        if self
            .topics
            .get(&entry.topic)
            .is_some_and(|entries| entries.is_empty())
        {
            self.topics.remove(&entry.topic);
        }

        tracing::debug!(
            subscription_id,
            topic = %entry.topic,
            events_delivered = entry.events_delivered,
            "subscription removed"
        );

        Ok(())
    }

    /// Deliver an event to every subscriber of its topic.
    ///
    /// Returns the number of callbacks invoked.
    pub fn publish(&mut self, event: &ChangeEvent) -> usize {
        let topic = event.topic();
        let Some(entries) = self.topics.get_mut(&topic) else {
            return 0;
        };

        for entry in entries.iter_mut() {
            entry.deliver(event);
        }

        tracing::trace!(
            %topic,
            sequence = event.sequence,
            subscribers = entries.len(),
            "published change event"
        );

        entries.len()
    }

    /// Get the number of active subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.topics.values().map(Vec::len).sum()
    }

    /// Get subscription IDs for a topic, in delivery order.
    pub fn subscriptions_for(&self, topic: Topic) -> Vec<u64> {
        self.topics
            .get(&topic)
            .map(|entries| entries.iter().map(|e| e.id).collect())
            .unwrap_or_default()
    }

    /// Get a subscription by ID.
    pub fn get_subscription(&self, subscription_id: u64) -> Option<&SubscriptionEntry> {
        self.topics
            .values()
            .flat_map(|entries| entries.iter())
            .find(|e| e.id == subscription_id)
    }
}

impl Default for PubSubManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PubSubManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PubSubManager")
            .field("subscriptions", &self.subscription_count())
            .field("next_subscription_id", &self.next_subscription_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use parking_lot::Mutex;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, label: &str) -> Callback {
        let log = Arc::clone(log);
        let label = label.to_string();
        Box::new(move |event| log.lock().push(format!("{}:{}", label, event.sequence)))
    }

    #[test]
    fn test_subscribe_unsubscribe() {
        let mut manager = PubSubManager::new();

        let id = manager.subscribe(Topic::Value, Box::new(|_| {}));

        assert_eq!(manager.subscription_count(), 1);
        assert_eq!(manager.subscriptions_for(Topic::Value), vec![id]);

        manager.unsubscribe(id).unwrap();

        assert_eq!(manager.subscription_count(), 0);
        assert!(manager.subscriptions_for(Topic::Value).is_empty());
    }

    #[test]
    fn test_unsubscribe_unknown() {
        let mut manager = PubSubManager::new();
        assert!(matches!(
            manager.unsubscribe(42),
            Err(Error::SubscriptionNotFound(42))
        ));
    }

    #[test]
    fn test_publish_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut manager = PubSubManager::new();
        manager.subscribe(Topic::Selection, recorder(&log, "first"));
        manager.subscribe(Topic::Selection, recorder(&log, "second"));
        manager.subscribe(Topic::Selection, recorder(&log, "third"));

        let delivered = manager.publish(&ChangeEvent::selection(7, vec![], vec![1]));

        assert_eq!(delivered, 3);
        assert_eq!(*log.lock(), vec!["first:7", "second:7", "third:7"]);
    }

    #[test]
    fn test_publish_only_matching_topic() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut manager = PubSubManager::new();
        manager.subscribe(Topic::Value, recorder(&log, "value"));

        let delivered = manager.publish(&ChangeEvent::selection(1, vec![], vec![0]));

        assert_eq!(delivered, 0);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_delivery_counts() {
        let mut manager = PubSubManager::new();
        let id = manager.subscribe(Topic::Selection, Box::new(|_| {}));

        manager.publish(&ChangeEvent::selection(1, vec![], vec![0]));
        manager.publish(&ChangeEvent::selection(2, vec![0], vec![1]));

        let entry = manager.get_subscription(id).unwrap();
        assert_eq!(entry.events_delivered, 2);
        assert!(manager.get_subscription(id + 1).is_none());
    }
}
