//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Optimistic writes**: list saves are conditional on the stored
//!   revision; view counters are atomic updates that also advance it.
//! - **Strongly typed errors**: All database errors are mapped to the port
//!   error types, with unique violations surfacing as `Duplicate*` variants.
//!
//! # Example
//!
//! ```ignore
//! use lister::outbound::persistence::{DbPool, PoolConfig, DieselUserRepository};
//!
//! let config = PoolConfig::new("postgres://localhost/lister");
//! let pool = DbPool::new(config).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_community_list_repository;
mod diesel_helpers;
mod diesel_personal_list_repository;
mod diesel_user_repository;
mod json_codec;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_community_list_repository::DieselCommunityListRepository;
pub use diesel_personal_list_repository::DieselPersonalListRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations, run_migrations_blocking};
pub use pool::{DbPool, PoolConfig, PoolError};
