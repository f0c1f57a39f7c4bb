//! Ball notifications and the observer list that delivers them.
//!
//! Delivery is synchronous: `emit` runs every listener before returning, and
//! the simulation only emits after it has finished the mutation the event
//! describes.

use crate::player::PlayerId;
use crate::vec3::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub enum BallEvent {
    /// New owner, or None when the ball became free
    PossessionChanged { owner: Option<PlayerId> },
    Kicked { direction: Vec3, power: f64 },
    StateChanged { in_air: bool, rolling: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&BallEvent) + Send>;

/// Multicast list of ball event listeners.
pub struct EventBus {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 1,
        }
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&BallEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Deliver to every listener in subscription order.
    pub fn emit(&mut self, event: BallEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
