//! PostgreSQL-backed `BloodRequestRepository` implementation.
//!
//! Status writes filter on the expected status so two racing transitions
//! cannot both succeed; the loser sees
//! [`BloodRequestRepositoryError::StatusChanged`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{BloodRequestRepository, BloodRequestRepositoryError};
use crate::domain::{AccountId, BloodRequest, RequestId, RequestStatus};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{BloodRequestRow, BloodRequestStatusUpdate};
use super::pool::{DbPool, PoolError};
use super::row_mapping::{blood_request_from_row, blood_request_to_row};
use super::schema::blood_requests;

/// Diesel-backed implementation of the `BloodRequestRepository` port.
#[derive(Clone)]
pub struct DieselBloodRequestRepository {
    pool: DbPool,
}

impl DieselBloodRequestRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BloodRequestRepositoryError {
    map_basic_pool_error(error, BloodRequestRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BloodRequestRepositoryError {
    map_basic_diesel_error(
        error,
        BloodRequestRepositoryError::query,
        BloodRequestRepositoryError::connection,
    )
}

fn to_domain(rows: Vec<BloodRequestRow>) -> Result<Vec<BloodRequest>, BloodRequestRepositoryError> {
    rows.into_iter()
        .map(|row| blood_request_from_row(row).map_err(BloodRequestRepositoryError::query))
        .collect()
}

#[async_trait]
impl BloodRequestRepository for DieselBloodRequestRepository {
    async fn insert_many(
        &self,
        requests: &[BloodRequest],
    ) -> Result<(), BloodRequestRepositoryError> {
        if requests.is_empty() {
            return Ok(());
        }
        let rows = requests
            .iter()
            .map(blood_request_to_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(BloodRequestRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // One multi-row INSERT, so the batch lands or fails as a whole.
        let inserted = diesel::insert_into(blood_requests::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(inserted, "blood requests stored");
        Ok(())
    }

    async fn find(
        &self,
        id: &RequestId,
    ) -> Result<Option<BloodRequest>, BloodRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        blood_requests::table
            .filter(blood_requests::id.eq(id.as_uuid()))
            .select(BloodRequestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(|row| blood_request_from_row(row).map_err(BloodRequestRepositoryError::query))
            .transpose()
    }

    async fn update(
        &self,
        request: &BloodRequest,
        expected: RequestStatus,
    ) -> Result<(), BloodRequestRepositoryError> {
        let request_id = *request.id().as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(
            blood_requests::table
                .filter(blood_requests::id.eq(request_id))
                .filter(blood_requests::status.eq(expected.as_str())),
        )
        .set(&BloodRequestStatusUpdate {
            status: request.status().as_str(),
            accepted_at: request.accepted_at(),
            rejected_at: request.rejected_at(),
            donated_at: request.donated_at(),
        })
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if updated > 0 {
            return Ok(());
        }

        let exists: bool = diesel::select(diesel::dsl::exists(
            blood_requests::table.filter(blood_requests::id.eq(request_id)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if exists {
            debug!(%request_id, %expected, "blood request status moved underneath update");
            Err(BloodRequestRepositoryError::status_changed(request_id, expected))
        } else {
            Err(BloodRequestRepositoryError::not_found(request_id))
        }
    }

    async fn list_for_donor(
        &self,
        donor_id: &AccountId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<BloodRequest>, BloodRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = blood_requests::table
            .filter(blood_requests::donor_id.eq(donor_id.as_uuid()))
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(blood_requests::status.eq(status.as_str()));
        }

        let rows: Vec<BloodRequestRow> = query
            .order((blood_requests::created_at.desc(), blood_requests::id.asc()))
            .select(BloodRequestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_domain(rows)
    }

    async fn list_for_hospital(
        &self,
        hospital_id: &AccountId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<BloodRequest>, BloodRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = blood_requests::table
            .filter(blood_requests::hospital_id.eq(hospital_id.as_uuid()))
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(blood_requests::status.eq(status.as_str()));
        }

        let rows: Vec<BloodRequestRow> = query
            .order((blood_requests::created_at.desc(), blood_requests::id.asc()))
            .select(BloodRequestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_domain(rows)
    }
}
