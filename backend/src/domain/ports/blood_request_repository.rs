//! Port for blood request persistence.
//!
//! Status updates are compare-and-set: [`BloodRequestRepository::update`]
//! only writes when the stored status still equals the status the caller
//! read. A concurrent transition therefore surfaces as
//! [`BloodRequestRepositoryError::StatusChanged`] instead of being lost.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AccountId, BloodRequest, RequestId, RequestStatus};

use super::define_port_error;

define_port_error! {
    /// Errors raised by blood request repository adapters.
    pub enum BloodRequestRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "blood request repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "blood request repository query failed: {message}",
        /// No request is stored under the identifier.
        NotFound { request_id: Uuid } =>
            "blood request {request_id} not found",
        /// The stored status no longer matches the caller's expectation.
        StatusChanged { request_id: Uuid, expected: RequestStatus } =>
            "blood request {request_id} is no longer {expected}",
    }
}

/// Port for blood request storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BloodRequestRepository: Send + Sync {
    /// Store freshly created requests. Either all are stored or none.
    async fn insert_many(&self, requests: &[BloodRequest]) -> Result<(), BloodRequestRepositoryError>;

    /// Fetch a request by identifier.
    async fn find(&self, id: &RequestId) -> Result<Option<BloodRequest>, BloodRequestRepositoryError>;

    /// Persist `request` when the stored status still equals `expected`.
    async fn update(
        &self,
        request: &BloodRequest,
        expected: RequestStatus,
    ) -> Result<(), BloodRequestRepositoryError>;

    /// Requests addressed to a donor, newest first, optionally filtered.
    async fn list_for_donor(
        &self,
        donor_id: &AccountId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<BloodRequest>, BloodRequestRepositoryError>;

    /// Requests issued by a hospital, newest first, optionally filtered.
    async fn list_for_hospital(
        &self,
        hospital_id: &AccountId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<BloodRequest>, BloodRequestRepositoryError>;
}
