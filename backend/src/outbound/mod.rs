//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: process-local repositories used when no database is
//!   configured and in tests
//! - **events**: the broadcast channel feeding live WebSocket sessions
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod events;
pub mod memory;
mod password;
pub mod persistence;
