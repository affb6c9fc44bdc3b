//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain values. Stored rows are re-validated on the way out.
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: database failures map onto each port's error
//!   enum; unique email violations surface as duplicate-email errors.
//!
//! # Example
//!
//! ```ignore
//! use bloodlink::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/bloodlink")).await?;
//! let accounts = DieselAccountRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_basic_error_mapping;
mod diesel_blood_request_repository;
mod diesel_identity_provider;
mod diesel_notification_repository;
mod diesel_profile_repositories;
mod migrations;
mod models;
mod pool;
mod row_mapping;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_blood_request_repository::DieselBloodRequestRepository;
pub use diesel_identity_provider::DieselIdentityProvider;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_profile_repositories::{DieselDonorProfileRepository, DieselHospitalProfileRepository};
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
