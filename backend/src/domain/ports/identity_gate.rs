//! Driving port for sign-up and sign-in.
//!
//! Inbound adapters call this port with validated [`Credentials`] and store
//! the returned account in the session. The port keeps one email bound to
//! one role across both portals.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Account, AccountId, Credentials, Error, NextStep, Role};

/// Account signed in plus where the client should go next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInOutcome {
    /// The signed-in account.
    pub account: Account,
    /// Profile setup or dashboard.
    pub next_step: NextStep,
}

impl From<Account> for SignInOutcome {
    fn from(account: Account) -> Self {
        let next_step = account.next_step();
        Self { account, next_step }
    }
}

/// Domain use-case port for identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityGate: Send + Sync {
    /// Create an identity and a `role` account for a new email.
    ///
    /// # Errors
    /// Returns a conflict when the email is registered in either role.
    async fn register(&self, role: Role, credentials: &Credentials)
    -> Result<SignInOutcome, Error>;

    /// Verify credentials for the `role` portal.
    ///
    /// # Errors
    /// Returns unauthorized for bad credentials and forbidden when the
    /// account belongs to the other role.
    async fn sign_in(&self, role: Role, credentials: &Credentials) -> Result<SignInOutcome, Error>;

    /// Load the account behind a session.
    ///
    /// # Errors
    /// Returns unauthorized when the account no longer exists.
    async fn current(&self, account_id: &AccountId) -> Result<SignInOutcome, Error>;
}
