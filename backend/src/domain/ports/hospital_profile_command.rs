//! Driving ports for hospital profile operations.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, HospitalProfile, HospitalProfileDraft};

/// Port for changing a hospital's own profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HospitalProfileCommand: Send + Sync {
    /// Validate and store the profile, copying the account email.
    ///
    /// Saving also marks the account's profile as completed.
    async fn save(
        &self,
        hospital_id: &AccountId,
        draft: HospitalProfileDraft,
    ) -> Result<HospitalProfile, Error>;
}

/// Port for reading a hospital's own profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HospitalProfileQuery: Send + Sync {
    /// Fetch the profile.
    ///
    /// # Errors
    /// Returns not found before the first save.
    async fn profile(&self, hospital_id: &AccountId) -> Result<HospitalProfile, Error>;
}
