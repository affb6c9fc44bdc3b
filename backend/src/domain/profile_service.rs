//! Donor and hospital profile services.
//!
//! Both services mark the owning account's profile as completed after a
//! successful save so the next sign-in routes to the dashboard.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::port_error_mapping::{
    map_account_error, map_donor_profile_error, map_hospital_profile_error,
};
use crate::domain::ports::{
    AccountRepository, DonorProfileCommand, DonorProfileQuery, DonorProfileRepository,
    HospitalProfileCommand, HospitalProfileQuery, HospitalProfileRepository,
};
use crate::domain::{
    AccountId, DonorProfile, DonorProfileDraft, Error, HospitalProfile, HospitalProfileDraft,
};

fn donor_profile_missing() -> Error {
    Error::not_found("donor profile has not been created yet")
}

fn hospital_profile_missing() -> Error {
    Error::not_found("hospital profile has not been created yet")
}

/// Donor profile service implementing the donor profile driving ports.
#[derive(Clone)]
pub struct DonorProfileService<A, D> {
    accounts: Arc<A>,
    profiles: Arc<D>,
    clock: Arc<dyn Clock>,
}

impl<A, D> DonorProfileService<A, D> {
    /// Create a new service over the account and donor profile stores.
    pub fn new(accounts: Arc<A>, profiles: Arc<D>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            profiles,
            clock,
        }
    }
}

impl<A, D> DonorProfileService<A, D>
where
    D: DonorProfileRepository,
{
    async fn existing(&self, donor_id: &AccountId) -> Result<Option<DonorProfile>, Error> {
        self.profiles
            .find(donor_id)
            .await
            .map_err(map_donor_profile_error)
    }
}

#[async_trait]
impl<A, D> DonorProfileCommand for DonorProfileService<A, D>
where
    A: AccountRepository,
    D: DonorProfileRepository,
{
    async fn save(
        &self,
        donor_id: &AccountId,
        draft: DonorProfileDraft,
    ) -> Result<DonorProfile, Error> {
        let created_at = self.existing(donor_id).await?.map(|p| p.created_at);
        let profile = DonorProfile::from_draft(*donor_id, draft, created_at, self.clock.utc())
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.profiles
            .upsert(&profile)
            .await
            .map_err(map_donor_profile_error)?;
        self.accounts
            .mark_profile_completed(donor_id)
            .await
            .map_err(map_account_error)?;

        info!(
            donor_id = %donor_id,
            eligible = profile.eligible,
            "donor profile saved"
        );
        Ok(profile)
    }

    async fn set_availability(
        &self,
        donor_id: &AccountId,
        available: bool,
    ) -> Result<DonorProfile, Error> {
        let mut profile = self
            .existing(donor_id)
            .await?
            .ok_or_else(donor_profile_missing)?;
        if let Err(err) = profile.set_availability(available, self.clock.utc()) {
            return Err(
                Error::invalid_request(err.to_string()).with_details(serde_json::json!({
                    "eligibilityReasons": profile.eligibility_reasons,
                })),
            );
        }

        self.profiles
            .upsert(&profile)
            .await
            .map_err(map_donor_profile_error)?;
        Ok(profile)
    }
}

#[async_trait]
impl<A, D> DonorProfileQuery for DonorProfileService<A, D>
where
    A: AccountRepository,
    D: DonorProfileRepository,
{
    async fn profile(&self, donor_id: &AccountId) -> Result<DonorProfile, Error> {
        self.existing(donor_id)
            .await?
            .ok_or_else(donor_profile_missing)
    }
}

/// Hospital profile service implementing the hospital profile driving ports.
#[derive(Clone)]
pub struct HospitalProfileService<A, H> {
    accounts: Arc<A>,
    profiles: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<A, H> HospitalProfileService<A, H> {
    /// Create a new service over the account and hospital profile stores.
    pub fn new(accounts: Arc<A>, profiles: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            profiles,
            clock,
        }
    }
}

#[async_trait]
impl<A, H> HospitalProfileCommand for HospitalProfileService<A, H>
where
    A: AccountRepository,
    H: HospitalProfileRepository,
{
    async fn save(
        &self,
        hospital_id: &AccountId,
        draft: HospitalProfileDraft,
    ) -> Result<HospitalProfile, Error> {
        let account = self
            .accounts
            .find_by_id(hospital_id)
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| Error::unauthorized("login required"))?;
        let created_at = self
            .profiles
            .find(hospital_id)
            .await
            .map_err(map_hospital_profile_error)?
            .map(|p| p.created_at);

        let profile = HospitalProfile::from_draft(
            *hospital_id,
            account.email,
            draft,
            created_at,
            self.clock.utc(),
        )
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.profiles
            .upsert(&profile)
            .await
            .map_err(map_hospital_profile_error)?;
        self.accounts
            .mark_profile_completed(hospital_id)
            .await
            .map_err(map_account_error)?;

        info!(hospital_id = %hospital_id, "hospital profile saved");
        Ok(profile)
    }
}

#[async_trait]
impl<A, H> HospitalProfileQuery for HospitalProfileService<A, H>
where
    A: AccountRepository,
    H: HospitalProfileRepository,
{
    async fn profile(&self, hospital_id: &AccountId) -> Result<HospitalProfile, Error> {
        self.profiles
            .find(hospital_id)
            .await
            .map_err(map_hospital_profile_error)?
            .ok_or_else(hospital_profile_missing)
    }
}

#[cfg(test)]
#[path = "profile_service_tests.rs"]
mod tests;
