//! Port for hospital profile persistence.

use async_trait::async_trait;

use crate::domain::{AccountId, HospitalProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by hospital profile repository adapters.
    pub enum HospitalProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "hospital profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "hospital profile repository query failed: {message}",
    }
}

/// Port for hospital profile storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HospitalProfileRepository: Send + Sync {
    /// Insert or replace the profile owned by `profile.account_id`.
    async fn upsert(&self, profile: &HospitalProfile)
    -> Result<(), HospitalProfileRepositoryError>;

    /// Fetch the profile owned by `account_id`.
    async fn find(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<HospitalProfile>, HospitalProfileRepositoryError>;
}
