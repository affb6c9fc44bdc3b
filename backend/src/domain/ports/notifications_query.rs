//! Driving ports for an account's notifications.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, Notification, NotificationId};

/// Port for listing notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsQuery: Send + Sync {
    /// Notifications addressed to the account, newest first.
    async fn list(&self, recipient_id: &AccountId) -> Result<Vec<Notification>, Error>;
}

/// Port for acknowledging notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsCommand: Send + Sync {
    /// Flag one of the account's notifications as read.
    ///
    /// # Errors
    /// Returns not found when the notification does not belong to the
    /// account.
    async fn mark_read(&self, recipient_id: &AccountId, id: &NotificationId)
    -> Result<(), Error>;
}
