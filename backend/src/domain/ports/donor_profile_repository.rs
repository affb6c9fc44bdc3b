//! Port for donor profile persistence and search.

use async_trait::async_trait;

use crate::domain::{AccountId, BloodGroup, DonorProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by donor profile repository adapters.
    pub enum DonorProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "donor profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "donor profile repository query failed: {message}",
    }
}

/// Port for donor profile storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonorProfileRepository: Send + Sync {
    /// Insert or replace the profile owned by `profile.account_id`.
    async fn upsert(&self, profile: &DonorProfile) -> Result<(), DonorProfileRepositoryError>;

    /// Fetch the profile owned by `account_id`.
    async fn find(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<DonorProfile>, DonorProfileRepositoryError>;

    /// List searchable donors (eligible and available) whose group is in
    /// `groups`, oldest profile first.
    async fn search(
        &self,
        groups: &[BloodGroup],
    ) -> Result<Vec<DonorProfile>, DonorProfileRepositoryError>;
}
