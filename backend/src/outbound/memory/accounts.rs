//! Accounts and sign-in identities.

use async_trait::async_trait;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, IdentityProvider, IdentityProviderError,
};
use crate::domain::{Account, AccountId, Credentials, EmailAddress};
use crate::outbound::password::{hash_password, verify_password};

use super::{InMemoryStore, StoredIdentity};

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn insert(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut state = self.write().map_err(AccountRepositoryError::query)?;
        if state
            .accounts
            .values()
            .any(|existing| existing.email == account.email)
        {
            return Err(AccountRepositoryError::duplicate_email(
                account.email.as_ref(),
            ));
        }
        state.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        let state = self.read().map_err(AccountRepositoryError::query)?;
        Ok(state.accounts.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let state = self.read().map_err(AccountRepositoryError::query)?;
        Ok(state
            .accounts
            .values()
            .find(|account| account.email == *email)
            .cloned())
    }

    async fn mark_profile_completed(&self, id: &AccountId) -> Result<(), AccountRepositoryError> {
        let mut state = self.write().map_err(AccountRepositoryError::query)?;
        match state.accounts.get_mut(id) {
            Some(account) => {
                account.profile_completed = true;
                Ok(())
            }
            None => Err(AccountRepositoryError::query(format!(
                "account {id} not found"
            ))),
        }
    }
}

#[async_trait]
impl IdentityProvider for InMemoryStore {
    async fn create_identity(
        &self,
        credentials: &Credentials,
    ) -> Result<AccountId, IdentityProviderError> {
        let password_hash = hash_password(credentials.password())
            .map_err(|err| IdentityProviderError::query(err.to_string()))?;
        let mut state = self.write().map_err(IdentityProviderError::query)?;
        if state
            .identities
            .values()
            .any(|identity| identity.email == *credentials.email())
        {
            return Err(IdentityProviderError::duplicate_email(
                credentials.email().as_ref(),
            ));
        }
        let id = AccountId::random();
        state.identities.insert(
            id,
            StoredIdentity {
                email: credentials.email().clone(),
                password_hash,
            },
        );
        Ok(id)
    }

    async fn verify(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<AccountId>, IdentityProviderError> {
        let state = self.read().map_err(IdentityProviderError::query)?;
        Ok(state
            .identities
            .iter()
            .find(|(_, identity)| identity.email == *credentials.email())
            .filter(|(_, identity)| verify_password(&identity.password_hash, credentials.password()))
            .map(|(id, _)| *id))
    }

    async fn remove_identity(&self, id: &AccountId) -> Result<(), IdentityProviderError> {
        let mut state = self.write().map_err(IdentityProviderError::query)?;
        state.identities.remove(id);
        Ok(())
    }
}
