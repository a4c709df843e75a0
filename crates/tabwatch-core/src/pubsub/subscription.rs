//! Subscription tracking.

use std::fmt;
use std::time::Instant;

use tabwatch_proto::{ChangeEvent, Topic};

/// Subscriber callback.
pub type Callback = Box<dyn FnMut(&ChangeEvent) + Send>;

/// A subscription entry tracking an active subscription.
pub struct SubscriptionEntry {
    /// Unique subscription ID.
    pub id: u64,
    /// Topic being watched.
    pub topic: Topic,
    /// When the subscription was created.
    pub created_at: Instant,
    /// Number of events delivered to this subscription.
    pub events_delivered: u64,
    callback: Callback,
}

impl SubscriptionEntry {
    /// Create a new subscription entry.
    pub fn new(id: u64, topic: Topic, callback: Callback) -> Self {
        Self {
            id,
            topic,
            created_at: Instant::now(),
            events_delivered: 0,
            callback,
        }
    }

    /// Get the age of this subscription.
    pub fn age(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }

    /// Invoke the callback and count the delivery.
    pub fn deliver(&mut self, event: &ChangeEvent) {
        (self.callback)(event);
        self.events_delivered += 1;
    }
}

impl fmt::Debug for SubscriptionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionEntry")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .field("events_delivered", &self.events_delivered)
            .finish_non_exhaustive()
    }
}
