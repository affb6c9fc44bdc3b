//! PostgreSQL-backed `NotificationRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{AccountId, Notification, NotificationId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NotificationRow;
use super::pool::{DbPool, PoolError};
use super::row_mapping::{notification_from_row, notification_to_row};
use super::schema::notifications;

/// Diesel-backed implementation of the `NotificationRepository` port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NotificationRepositoryError {
    map_basic_pool_error(error, NotificationRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> NotificationRepositoryError {
    map_basic_diesel_error(
        error,
        NotificationRepositoryError::query,
        NotificationRepositoryError::connection,
    )
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert_many(
        &self,
        notifications: &[Notification],
    ) -> Result<(), NotificationRepositoryError> {
        if notifications.is_empty() {
            return Ok(());
        }
        let rows = notifications
            .iter()
            .map(notification_to_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(NotificationRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(notifications::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for(
        &self,
        recipient_id: &AccountId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NotificationRow> = notifications::table
            .filter(notifications::recipient_id.eq(recipient_id.as_uuid()))
            .order((notifications::created_at.desc(), notifications::id.asc()))
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| notification_from_row(row).map_err(NotificationRepositoryError::query))
            .collect()
    }

    async fn mark_read(
        &self,
        id: &NotificationId,
        recipient_id: &AccountId,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(
            notifications::table
                .filter(notifications::id.eq(id.as_uuid()))
                .filter(notifications::recipient_id.eq(recipient_id.as_uuid())),
        )
        .set(notifications::read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }
}
