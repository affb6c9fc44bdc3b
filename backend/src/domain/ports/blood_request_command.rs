//! Driving port for blood request transitions.
//!
//! Every call acts on behalf of one signed-in account. Donors may only answer
//! requests addressed to them and hospitals may only complete requests they
//! issued; anything else is reported as not found.

use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{AccountId, BloodGroup, BloodRequest, Error, RequestId};

/// Hospital input for a new request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBloodRequest {
    /// Requested group.
    pub blood_group: BloodGroup,
    /// Units needed; at least one.
    pub units_required: u32,
    /// Donors to address. Every current match is addressed when omitted.
    #[serde(default)]
    pub donor_ids: Option<Vec<AccountId>>,
}

/// Port for creating and advancing requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BloodRequestCommand: Send + Sync {
    /// Send one pending request to each addressed donor.
    ///
    /// # Errors
    /// Returns not found before the hospital profile exists and invalid
    /// request when no donor matches or a listed donor is not a match.
    async fn create(
        &self,
        hospital_id: &AccountId,
        request: CreateBloodRequest,
    ) -> Result<Vec<BloodRequest>, Error>;

    /// Donor accepts a pending request.
    async fn accept(&self, donor_id: &AccountId, request_id: &RequestId)
    -> Result<BloodRequest, Error>;

    /// Donor declines a pending request.
    async fn reject(&self, donor_id: &AccountId, request_id: &RequestId)
    -> Result<BloodRequest, Error>;

    /// Hospital records the donation of an accepted request.
    async fn mark_donated(
        &self,
        hospital_id: &AccountId,
        request_id: &RequestId,
    ) -> Result<BloodRequest, Error>;
}
