//! PostgreSQL-backed `IdentityProvider` storing Argon2id password hashes.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{AccountId, Credentials};
use crate::outbound::password::{hash_password, verify_password};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{IdentityRow, NewIdentityRow};
use super::pool::{DbPool, PoolError};
use super::schema::identities;

const EMAIL_CONSTRAINT: &str = "identities_email_key";

/// Diesel-backed implementation of the `IdentityProvider` port.
#[derive(Clone)]
pub struct DieselIdentityProvider {
    pool: DbPool,
}

impl DieselIdentityProvider {
    /// Create a new provider with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IdentityProviderError {
    map_basic_pool_error(error, IdentityProviderError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> IdentityProviderError {
    map_basic_diesel_error(
        error,
        IdentityProviderError::query,
        IdentityProviderError::connection,
    )
}

#[async_trait]
impl IdentityProvider for DieselIdentityProvider {
    async fn create_identity(
        &self,
        credentials: &Credentials,
    ) -> Result<AccountId, IdentityProviderError> {
        let password_hash = hash_password(credentials.password())
            .map_err(|err| IdentityProviderError::query(err.to_string()))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = Uuid::new_v4();

        diesel::insert_into(identities::table)
            .values(&NewIdentityRow {
                id,
                email: credentials.email().as_ref(),
                password_hash: &password_hash,
            })
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err, EMAIL_CONSTRAINT) {
                    IdentityProviderError::duplicate_email(credentials.email().as_ref())
                } else {
                    map_diesel_error(err)
                }
            })?;

        Ok(AccountId::from_uuid(id))
    }

    async fn verify(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<AccountId>, IdentityProviderError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let identity: Option<IdentityRow> = identities::table
            .filter(identities::email.eq(credentials.email().as_ref()))
            .select(IdentityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(identity
            .filter(|row| verify_password(&row.password_hash, credentials.password()))
            .map(|row| AccountId::from_uuid(row.id)))
    }

    async fn remove_identity(&self, id: &AccountId) -> Result<(), IdentityProviderError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(identities::table.filter(identities::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
