//! Wire-level message definitions for the live feed.
//!
//! Domain events are transformed into these payloads before being serialized
//! to JSON and sent to connected clients. Every frame is tagged with `type`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BloodRequest, DomainEvent, Notification};

/// Inbound frame sent by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Ask for a fresh snapshot, e.g. after the client missed frames.
    Resync,
}

/// Outbound frame pushed to the client.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FeedMessage {
    /// Full state of the account's requests and notifications.
    Snapshot {
        /// Requests the account issued or received, newest first.
        requests: Vec<BloodRequest>,
        /// Notifications addressed to the account, newest first.
        notifications: Vec<Notification>,
    },
    /// A request was created or changed status.
    RequestChanged {
        /// The request after the change.
        request: BloodRequest,
    },
    /// A notification was stored for the account.
    NotificationCreated {
        /// The new notification.
        notification: Notification,
    },
}

impl From<DomainEvent> for FeedMessage {
    fn from(event: DomainEvent) -> Self {
        match event {
            DomainEvent::RequestChanged(request) => Self::RequestChanged { request },
            DomainEvent::NotificationCreated(notification) => {
                Self::NotificationCreated { notification }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::pending_request;
    use crate::domain::{AccountId, Notification};
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case(r#"{"type":"resync"}"#)]
    #[case(r#"{"type":"resync","extra":true}"#)]
    fn parses_resync(#[case] raw: &str) {
        let message: ClientMessage = serde_json::from_str(raw).expect("resync frame");
        assert_eq!(message, ClientMessage::Resync);
    }

    #[rstest]
    #[case(r#"{"type":"subscribe"}"#)]
    #[case("resync")]
    fn rejects_unknown_frames(#[case] raw: &str) {
        assert!(serde_json::from_str::<ClientMessage>(raw).is_err());
    }

    #[rstest]
    fn notification_events_are_tagged() {
        let request = pending_request(AccountId::random(), AccountId::random());
        let notification = Notification::request_received(&request, Utc::now());
        let frame = FeedMessage::from(DomainEvent::NotificationCreated(notification.clone()));

        let value = serde_json::to_value(&frame).expect("serialise frame");

        assert_eq!(value["type"], "notificationCreated");
        assert_eq!(
            value["notification"]["id"].as_str(),
            Some(notification.id.to_string().as_str())
        );
    }

    #[rstest]
    fn request_events_carry_the_status() {
        let request = pending_request(AccountId::random(), AccountId::random());
        let frame = FeedMessage::from(DomainEvent::RequestChanged(request));

        let value: Value = serde_json::to_value(&frame).expect("serialise frame");

        assert_eq!(value["type"], "requestChanged");
        assert_eq!(value["request"]["status"], "pending");
    }
}
