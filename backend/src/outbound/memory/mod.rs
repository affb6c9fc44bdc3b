//! In-process adapters backed by a single locked state value.
//!
//! [`InMemoryStore`] implements every driven port so the service can run
//! without PostgreSQL. Data lives for the lifetime of the process. The same
//! uniqueness and compare-and-set rules as the Diesel adapters apply, so
//! behaviour does not change with the backend.

mod accounts;
mod profiles;
mod requests;

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{
    Account, AccountId, BloodRequest, DonorProfile, EmailAddress, HospitalProfile, Notification,
    RequestId,
};

const POISONED: &str = "in-memory store lock poisoned";

struct StoredIdentity {
    email: EmailAddress,
    password_hash: String,
}

#[derive(Default)]
struct State {
    identities: HashMap<AccountId, StoredIdentity>,
    accounts: HashMap<AccountId, Account>,
    donors: HashMap<AccountId, DonorProfile>,
    hospitals: HashMap<AccountId, HospitalProfile>,
    requests: HashMap<RequestId, BloodRequest>,
    notifications: Vec<Notification>,
}

/// Process-local store implementing the repository and identity ports.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, &'static str> {
        self.state.read().map_err(|_| POISONED)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, &'static str> {
        self.state.write().map_err(|_| POISONED)
    }
}
