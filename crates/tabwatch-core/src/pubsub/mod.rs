//! Pub-sub infrastructure for change notifications.
//!
//! Subscribers register a callback against a [`Topic`](tabwatch_proto::Topic)
//! and receive every event published on it, synchronously and in
//! registration order.

mod manager;
mod subscription;

pub use manager::PubSubManager;
pub use subscription::{Callback, SubscriptionEntry};
