//! Port for account persistence.
//!
//! The store owns the one-email-one-role rule: [`AccountRepository::insert`]
//! must fail with [`AccountRepositoryError::DuplicateEmail`] when the email is
//! already taken, whichever role holds it. Services still look the email up
//! first to produce a role-specific message, but the store decides races.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, EmailAddress};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "account repository query failed: {message}",
        /// Another account already uses the email.
        DuplicateEmail { email: String } =>
            "an account already exists for {email}",
    }
}

/// Port for account storage and lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Store a newly registered account.
    async fn insert(&self, account: &Account) -> Result<(), AccountRepositoryError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError>;

    /// Fetch the account registered with `email`, in either role.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Account>, AccountRepositoryError>;

    /// Flag that the account's role-specific profile has been saved.
    ///
    /// Marking an already completed account is a no-op.
    async fn mark_profile_completed(&self, id: &AccountId) -> Result<(), AccountRepositoryError>;
}
