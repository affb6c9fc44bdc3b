//! In-process event bus built on `tokio::sync::broadcast`.
//!
//! Every live-feed connection holds its own receiver. Slow receivers lose the
//! oldest events and observe `RecvError::Lagged`, which the feed answers with
//! a fresh snapshot.

use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::DomainEvent;
use crate::domain::ports::{EventPublisher, EventSubscriber};

/// Broadcast-backed implementation of the event ports.
#[derive(Clone)]
pub struct BroadcastEventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl BroadcastEventBus {
    /// Buffered events per receiver before it lags.
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a bus buffering `capacity` events per receiver.
    ///
    /// A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Number of open subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastEventBus {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl EventPublisher for BroadcastEventBus {
    fn publish(&self, event: DomainEvent) {
        let label = event.label();
        match self.sender.send(event) {
            Ok(receivers) => debug!(event = label, receivers, "domain event published"),
            Err(_) => debug!(event = label, "domain event dropped without subscribers"),
        }
    }
}

impl EventSubscriber for BroadcastEventBus {
    fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tokio::sync::broadcast::error::RecvError;

    use super::*;
    use crate::domain::{
        AccountId, BloodGroup, BloodRequest, EmailAddress, HospitalContact, Notification, Pincode,
    };

    fn event() -> DomainEvent {
        let request = BloodRequest::pending(
            AccountId::random(),
            AccountId::random(),
            BloodGroup::ONegative,
            1,
            HospitalContact {
                name: "City General".into(),
                phone: "080-5550100".into(),
                email: EmailAddress::new("desk@citygeneral.org").expect("valid email"),
                city: "Bengaluru".into(),
                state: "Karnataka".into(),
                country: "India".into(),
                pincode: Pincode::new(560_001).expect("valid pincode"),
            },
            Utc::now(),
        )
        .expect("valid request");
        DomainEvent::NotificationCreated(Notification::request_received(&request, Utc::now()))
    }

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = BroadcastEventBus::default();
        let mut receiver = bus.subscribe();
        let sent = event();

        bus.publish(sent.clone());

        assert_eq!(receiver.recv().await.expect("event"), sent);
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_silent() {
        let bus = BroadcastEventBus::default();
        bus.publish(event());
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn slow_subscribers_observe_lag() {
        let bus = BroadcastEventBus::new(1);
        let mut receiver = bus.subscribe();

        bus.publish(event());
        bus.publish(event());

        assert!(matches!(receiver.recv().await, Err(RecvError::Lagged(1))));
    }
}
