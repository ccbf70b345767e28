//! In-memory status page store backed by DashMap.
//!
//! Production: replace with PostgreSQL (sqlx) or similar ACID store.
//! This provides the same API surface for development and testing.

pub mod keys;
pub mod store;

pub use store::{StatusStore, VerifyOutcome};
