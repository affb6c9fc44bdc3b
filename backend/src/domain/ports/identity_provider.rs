//! Driven port for the external identity provider.
//!
//! The provider owns password storage and verification. The rest of the
//! system only ever sees the [`AccountId`] it issues.

use async_trait::async_trait;

use crate::domain::{AccountId, Credentials};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// Provider could not be reached.
        Connection { message: String } =>
            "identity provider connection failed: {message}",
        /// Provider rejected or failed the operation.
        Query { message: String } =>
            "identity provider query failed: {message}",
        /// An identity already exists for the email.
        DuplicateEmail { email: String } =>
            "an identity already exists for {email}",
    }
}

/// Port for creating and verifying sign-in identities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an identity and return its identifier.
    async fn create_identity(
        &self,
        credentials: &Credentials,
    ) -> Result<AccountId, IdentityProviderError>;

    /// Check credentials, returning the identity when they match.
    ///
    /// Unknown emails and wrong passwords both yield `Ok(None)`.
    async fn verify(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<AccountId>, IdentityProviderError>;

    /// Remove an identity whose account could not be stored.
    async fn remove_identity(&self, id: &AccountId) -> Result<(), IdentityProviderError>;
}
