//! Driving ports for donor profile operations.

use async_trait::async_trait;

use crate::domain::{AccountId, DonorProfile, DonorProfileDraft, Error};

/// Port for changing a donor's own profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonorProfileCommand: Send + Sync {
    /// Validate and store the profile, re-evaluating eligibility.
    ///
    /// Saving also marks the account's profile as completed.
    async fn save(
        &self,
        donor_id: &AccountId,
        draft: DonorProfileDraft,
    ) -> Result<DonorProfile, Error>;

    /// Toggle whether hospitals may find the donor.
    ///
    /// # Errors
    /// Returns not found before the profile exists and invalid request when
    /// an ineligible donor asks to become available.
    async fn set_availability(
        &self,
        donor_id: &AccountId,
        available: bool,
    ) -> Result<DonorProfile, Error>;
}

/// Port for reading a donor's own profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonorProfileQuery: Send + Sync {
    /// Fetch the profile.
    ///
    /// # Errors
    /// Returns not found before the first save.
    async fn profile(&self, donor_id: &AccountId) -> Result<DonorProfile, Error>;
}
