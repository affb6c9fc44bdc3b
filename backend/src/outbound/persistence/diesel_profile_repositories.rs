//! PostgreSQL-backed donor and hospital profile repositories.
//!
//! Both tables are keyed by the owning account, so saves are upserts on the
//! primary key.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    DonorProfileRepository, DonorProfileRepositoryError, HospitalProfileRepository,
    HospitalProfileRepositoryError,
};
use crate::domain::{AccountId, BloodGroup, DonorProfile, HospitalProfile};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{DonorProfileRow, HospitalProfileRow};
use super::pool::DbPool;
use super::row_mapping::{
    donor_profile_from_row, donor_profile_to_row, hospital_profile_from_row,
    hospital_profile_to_row,
};
use super::schema::{donor_profiles, hospital_profiles};

/// Diesel-backed implementation of the `DonorProfileRepository` port.
#[derive(Clone)]
pub struct DieselDonorProfileRepository {
    pool: DbPool,
}

impl DieselDonorProfileRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_donor_diesel_error(error: diesel::result::Error) -> DonorProfileRepositoryError {
    map_basic_diesel_error(
        error,
        DonorProfileRepositoryError::query,
        DonorProfileRepositoryError::connection,
    )
}

#[async_trait]
impl DonorProfileRepository for DieselDonorProfileRepository {
    async fn upsert(&self, profile: &DonorProfile) -> Result<(), DonorProfileRepositoryError> {
        let row = donor_profile_to_row(profile).map_err(DonorProfileRepositoryError::query)?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, DonorProfileRepositoryError::connection))?;

        diesel::insert_into(donor_profiles::table)
            .values(&row)
            .on_conflict(donor_profiles::account_id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_donor_diesel_error)
    }

    async fn find(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<DonorProfile>, DonorProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, DonorProfileRepositoryError::connection))?;

        donor_profiles::table
            .filter(donor_profiles::account_id.eq(account_id.as_uuid()))
            .select(DonorProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_donor_diesel_error)?
            .map(|row| donor_profile_from_row(row).map_err(DonorProfileRepositoryError::query))
            .transpose()
    }

    async fn search(
        &self,
        groups: &[BloodGroup],
    ) -> Result<Vec<DonorProfile>, DonorProfileRepositoryError> {
        let wanted: Vec<&str> = groups.iter().map(|group| group.as_str()).collect();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, DonorProfileRepositoryError::connection))?;

        let rows: Vec<DonorProfileRow> = donor_profiles::table
            .filter(donor_profiles::eligible.eq(true))
            .filter(donor_profiles::available.eq(true))
            .filter(donor_profiles::blood_group.eq_any(wanted))
            .order((donor_profiles::created_at.asc(), donor_profiles::account_id.asc()))
            .select(DonorProfileRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_donor_diesel_error)?;

        rows.into_iter()
            .map(|row| donor_profile_from_row(row).map_err(DonorProfileRepositoryError::query))
            .collect()
    }
}

/// Diesel-backed implementation of the `HospitalProfileRepository` port.
#[derive(Clone)]
pub struct DieselHospitalProfileRepository {
    pool: DbPool,
}

impl DieselHospitalProfileRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_hospital_diesel_error(error: diesel::result::Error) -> HospitalProfileRepositoryError {
    map_basic_diesel_error(
        error,
        HospitalProfileRepositoryError::query,
        HospitalProfileRepositoryError::connection,
    )
}

#[async_trait]
impl HospitalProfileRepository for DieselHospitalProfileRepository {
    async fn upsert(
        &self,
        profile: &HospitalProfile,
    ) -> Result<(), HospitalProfileRepositoryError> {
        let row =
            hospital_profile_to_row(profile).map_err(HospitalProfileRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(|err| {
            map_basic_pool_error(err, HospitalProfileRepositoryError::connection)
        })?;

        diesel::insert_into(hospital_profiles::table)
            .values(&row)
            .on_conflict(hospital_profiles::account_id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_hospital_diesel_error)
    }

    async fn find(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<HospitalProfile>, HospitalProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| {
            map_basic_pool_error(err, HospitalProfileRepositoryError::connection)
        })?;

        hospital_profiles::table
            .filter(hospital_profiles::account_id.eq(account_id.as_uuid()))
            .select(HospitalProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_hospital_diesel_error)?
            .map(|row| {
                hospital_profile_from_row(row).map_err(HospitalProfileRepositoryError::query)
            })
            .transpose()
    }
}
