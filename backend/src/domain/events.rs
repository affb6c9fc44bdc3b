//! Domain events published after request and notification changes.
//!
//! Events stay transport agnostic so the WebSocket adapter can map them to
//! its own JSON envelopes and decide which connected accounts see them.

use crate::domain::{AccountId, BloodRequest, Notification};

/// Change observable by one or more accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    /// A request was created or changed status.
    RequestChanged(BloodRequest),
    /// A notification was stored for its recipient.
    NotificationCreated(Notification),
}

impl DomainEvent {
    /// Whether `account` should observe the event.
    #[must_use]
    pub fn concerns(&self, account: &AccountId) -> bool {
        match self {
            Self::RequestChanged(request) => request.involves(account),
            Self::NotificationCreated(notification) => notification.recipient_id == *account,
        }
    }

    /// Short label used in logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::RequestChanged(_) => "request_changed",
            Self::NotificationCreated(_) => "notification_created",
        }
    }
}
