//! Identity gate service.
//!
//! Registration checks the email against both roles before creating an
//! identity, then relies on the account store's unique email constraint to
//! settle races between concurrent sign-ups.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::port_error_mapping::{map_account_error, map_identity_error};
use crate::domain::ports::{AccountRepository, IdentityGate, IdentityProvider, SignInOutcome};
use crate::domain::{Account, AccountId, Credentials, Error, Role};

fn already_registered(existing: Role, requested: Role) -> Error {
    if existing == requested {
        Error::conflict(format!(
            "This email is already registered as a {existing}. Please sign in to the {existing} portal instead."
        ))
    } else {
        Error::conflict(format!(
            "This email is already registered as a {existing}. Please use a different email or login to {existing} portal."
        ))
    }
}

fn wrong_portal(requested: Role) -> Error {
    let other = requested.other();
    Error::forbidden(format!(
        "This account is not registered as a {requested}. Please sign up as a {requested} or login to {other} portal."
    ))
}

/// Identity service implementing [`IdentityGate`].
#[derive(Clone)]
pub struct IdentityService<A, I> {
    accounts: Arc<A>,
    identities: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<A, I> IdentityService<A, I> {
    /// Create a new service over the account store and identity provider.
    pub fn new(accounts: Arc<A>, identities: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            identities,
            clock,
        }
    }
}

#[async_trait]
impl<A, I> IdentityGate for IdentityService<A, I>
where
    A: AccountRepository,
    I: IdentityProvider,
{
    async fn register(
        &self,
        role: Role,
        credentials: &Credentials,
    ) -> Result<SignInOutcome, Error> {
        if let Some(existing) = self
            .accounts
            .find_by_email(credentials.email())
            .await
            .map_err(map_account_error)?
        {
            return Err(already_registered(existing.role, role));
        }

        let id = self
            .identities
            .create_identity(credentials)
            .await
            .map_err(map_identity_error)?;
        let account = Account::register(id, credentials.email().clone(), role, self.clock.utc());

        if let Err(err) = self.accounts.insert(&account).await {
            if let Err(cleanup) = self.identities.remove_identity(&id).await {
                warn!(account_id = %id, error = %cleanup, "orphaned identity after failed registration");
            }
            return Err(map_account_error(err));
        }

        info!(account_id = %id, role = %role, "account registered");
        Ok(account.into())
    }

    async fn sign_in(&self, role: Role, credentials: &Credentials) -> Result<SignInOutcome, Error> {
        let id = self
            .identities
            .verify(credentials)
            .await
            .map_err(map_identity_error)?
            .ok_or_else(|| Error::unauthorized("Invalid email or password."))?;

        let account = self
            .accounts
            .find_by_id(&id)
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| wrong_portal(role))?;
        if account.role != role {
            return Err(wrong_portal(role));
        }

        Ok(account.into())
    }

    async fn current(&self, account_id: &AccountId) -> Result<SignInOutcome, Error> {
        self.accounts
            .find_by_id(account_id)
            .await
            .map_err(map_account_error)?
            .map(SignInOutcome::from)
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
