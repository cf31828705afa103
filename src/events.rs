//! Event bus: typed lifecycle notifications out of the overlay.
//!
//! Subscribers register a callback and get back a [`Subscription`] handle;
//! handles that belong to one logical scope (a selection, a drag session,
//! the host UI) are collected in a [`SubscriptionSet`] and disposed as a
//! group on teardown. There is no string-keyed namespace — a subscription
//! is exactly its handle.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use serde::{Deserialize, Serialize};

use crate::scene::NodeId;

/// Transform snapshot carried by [`OverlayEvent::Transformed`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformPayload {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Local rotation, degrees, normalized to `[0, 360)`.
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

/// Notifications published by the overlay controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OverlayEvent {
    /// A node became the active selection.
    Selected(NodeId),
    /// A node stopped being the active selection.
    Deselected(NodeId),
    /// The selection is now empty.
    SelectionCleared,
    /// A node's transform changed through an overlay gesture.
    Transformed { id: NodeId, transform: TransformPayload },
    /// A temporary multi-selection was formed.
    MultiCreated(Vec<NodeId>),
    /// The temporary multi-selection was dissolved.
    MultiDestroyed,
    /// A temporary multi-selection was committed to a permanent group.
    GroupCreated { group: NodeId, members: Vec<NodeId> },
}

/// Opaque handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Callback = Box<dyn FnMut(&OverlayEvent)>;

/// Single-threaded publish/subscribe bus.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<(Subscription, Callback)>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; the returned handle removes it again.
    pub fn subscribe(&mut self, callback: Callback) -> Subscription {
        self.next_id += 1;
        let handle = Subscription(self.next_id);
        self.subscribers.push((handle, callback));
        handle
    }

    /// Remove one subscription. Unknown handles are ignored.
    pub fn unsubscribe(&mut self, handle: Subscription) {
        self.subscribers.retain(|(h, _)| *h != handle);
    }

    /// Deliver an event to every live subscriber, in subscription order.
    pub fn publish(&mut self, event: &OverlayEvent) {
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Subscription handles owned by one logical scope, dropped together.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    handles: Vec<Subscription>,
}

impl SubscriptionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a handle for group disposal.
    pub fn push(&mut self, handle: Subscription) {
        self.handles.push(handle);
    }

    /// Unsubscribe everything in this set and empty it.
    pub fn dispose(&mut self, bus: &mut EventBus) {
        for handle in self.handles.drain(..) {
            bus.unsubscribe(handle);
        }
    }

    /// Whether the set currently tracks no handles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
