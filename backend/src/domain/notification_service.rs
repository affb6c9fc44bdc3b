//! Notification listing and acknowledgement.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::port_error_mapping::map_notification_error;
use crate::domain::ports::{NotificationRepository, NotificationsCommand, NotificationsQuery};
use crate::domain::{AccountId, Error, Notification, NotificationId};

/// Notification service implementing the notification driving ports.
#[derive(Clone)]
pub struct NotificationsService<N> {
    notifications: Arc<N>,
}

impl<N> NotificationsService<N> {
    /// Create a new service over the notification store.
    pub fn new(notifications: Arc<N>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl<N> NotificationsQuery for NotificationsService<N>
where
    N: NotificationRepository,
{
    async fn list(&self, recipient_id: &AccountId) -> Result<Vec<Notification>, Error> {
        self.notifications
            .list_for(recipient_id)
            .await
            .map_err(map_notification_error)
    }
}

#[async_trait]
impl<N> NotificationsCommand for NotificationsService<N>
where
    N: NotificationRepository,
{
    async fn mark_read(&self, recipient_id: &AccountId, id: &NotificationId) -> Result<(), Error> {
        let updated = self
            .notifications
            .mark_read(id, recipient_id)
            .await
            .map_err(map_notification_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::not_found(format!("notification {id} not found")))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockNotificationRepository, NotificationRepositoryError};

    #[tokio::test]
    async fn marking_someone_elses_notification_is_not_found() {
        let mut store = MockNotificationRepository::new();
        store
            .expect_mark_read()
            .times(1)
            .return_once(|_, _| Ok(false));

        let err = NotificationsService::new(Arc::new(store))
            .mark_read(&AccountId::random(), &NotificationId::random())
            .await
            .expect_err("not owned");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn marking_an_owned_notification_succeeds() {
        let recipient = AccountId::random();
        let mut store = MockNotificationRepository::new();
        store
            .expect_mark_read()
            .withf(move |_, owner| *owner == recipient)
            .times(1)
            .return_once(|_, _| Ok(true));

        NotificationsService::new(Arc::new(store))
            .mark_read(&recipient, &NotificationId::random())
            .await
            .expect("marked read");
    }

    #[tokio::test]
    async fn listing_maps_store_failures() {
        let mut store = MockNotificationRepository::new();
        store
            .expect_list_for()
            .times(1)
            .return_once(|_| Err(NotificationRepositoryError::query("boom")));

        let err = NotificationsService::new(Arc::new(store))
            .list(&AccountId::random())
            .await
            .expect_err("query failed");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
