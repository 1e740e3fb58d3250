//! PostgreSQL storage backend for the Carebook server.
//!
//! Documents are stored as JSONB in three tables (`users`, `messages`,
//! `appointments`). Schema creation is idempotent and runs at connect time.
//!
//! # Example
//!
//! ```ignore
//! use carebook_db_postgres::{PostgresConfig, PostgresStorage};
//!
//! let storage = PostgresStorage::new(PostgresConfig::new("postgres://localhost/carebook")).await?;
//! ```
//!
//! - [`PostgresConfig`]: pool settings
//! - [`PostgresError`]: backend error type
//! - [`PostgresStorage`]: trait implementations

mod config;
mod error;
mod pool;
mod schema;
mod storage;

pub use config::PostgresConfig;
pub use error::{PostgresError, Result};
pub use pool::create_pool;
pub use schema::init_schema;
pub use storage::PostgresStorage;

pub use sqlx_postgres::PgPool;
