//! Driving port for reading blood requests.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    AccountId, BloodGroup, BloodRequest, DonorProfile, Error, Location, RequestStats,
    RequestStatus,
};

/// What a hospital sees of the donor a request went to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonorSummary {
    /// Full name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// ABO/Rh group.
    pub blood_group: BloodGroup,
    /// Postal location.
    #[serde(flatten)]
    pub location: Location,
}

impl From<DonorProfile> for DonorSummary {
    fn from(profile: DonorProfile) -> Self {
        Self {
            name: profile.name,
            phone: profile.phone,
            blood_group: profile.blood_group,
            location: profile.location,
        }
    }
}

/// A hospital's request together with its donor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HospitalRequest {
    /// The request itself.
    #[serde(flatten)]
    pub request: BloodRequest,
    /// `None` once the donor's profile no longer exists.
    pub donor: Option<DonorSummary>,
}

/// Port for request listings and hospital statistics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BloodRequestQuery: Send + Sync {
    /// Requests addressed to the donor, newest first.
    async fn for_donor(
        &self,
        donor_id: &AccountId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<BloodRequest>, Error>;

    /// Requests issued by the hospital, newest first.
    async fn for_hospital(
        &self,
        hospital_id: &AccountId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<BloodRequest>, Error>;

    /// Requests issued by the hospital with each donor's contact details,
    /// newest first.
    async fn hospital_roster(
        &self,
        hospital_id: &AccountId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<HospitalRequest>, Error>;

    /// Per-status counts and success rate for the hospital.
    async fn hospital_stats(&self, hospital_id: &AccountId) -> Result<RequestStats, Error>;
}
