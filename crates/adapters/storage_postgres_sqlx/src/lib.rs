//! # devicestore-adapter-storage-postgres-sqlx
//!
//! `PostgreSQL` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port trait defined in `devicestore-app::ports::storage`
//! - Manage the `PostgreSQL` connection pool lifecycle
//! - Create the `devices` table and its brand index idempotently on start
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `devicestore-app` (for port traits) and `devicestore-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod device_repo;
mod error;
mod pool;

pub use device_repo::PostgresDeviceRepository;
pub use error::StorageError;
pub use pool::{Config, Database};
