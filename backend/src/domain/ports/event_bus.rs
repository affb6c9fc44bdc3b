//! Ports for publishing and observing domain events.
//!
//! Publishing is fire-and-forget: a change is already stored when its event
//! is published, so having no subscribers is not an error.

use tokio::sync::broadcast;

use crate::domain::DomainEvent;

/// Driven port used by services to announce changes.
#[cfg_attr(test, mockall::automock)]
pub trait EventPublisher: Send + Sync {
    /// Announce `event` to current subscribers.
    fn publish(&self, event: DomainEvent);
}

/// Port used by live-feed adapters to observe changes.
pub trait EventSubscriber: Send + Sync {
    /// Open a subscription that sees every event published afterwards.
    fn subscribe(&self) -> broadcast::Receiver<DomainEvent>;
}

/// Publisher that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpEventPublisher;

impl EventPublisher for NoOpEventPublisher {
    fn publish(&self, _event: DomainEvent) {}
}
