//! Port for notification persistence.

use async_trait::async_trait;

use crate::domain::{AccountId, Notification, NotificationId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "notification repository query failed: {message}",
    }
}

/// Port for notification storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Store new notifications.
    async fn insert_many(
        &self,
        notifications: &[Notification],
    ) -> Result<(), NotificationRepositoryError>;

    /// Notifications addressed to `recipient_id`, newest first.
    async fn list_for(
        &self,
        recipient_id: &AccountId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Flag a notification as read.
    ///
    /// Returns `false` when no notification with `id` belongs to
    /// `recipient_id`.
    async fn mark_read(
        &self,
        id: &NotificationId,
        recipient_id: &AccountId,
    ) -> Result<bool, NotificationRepositoryError>;
}
