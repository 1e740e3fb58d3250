//! Idempotent table creation.

use sqlx_core::query::query;
use sqlx_postgres::PgPool;
use tracing::info;

use crate::error::{PostgresError, Result};

pub(crate) const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        resource JSONB NOT NULL,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"CREATE UNIQUE INDEX IF NOT EXISTS users_email_key ON users ((resource->>'email'))"#,
    r#"CREATE INDEX IF NOT EXISTS users_role_idx ON users ((resource->>'role'))"#,
    r#"
    CREATE TABLE IF NOT EXISTS messages (
        id UUID PRIMARY KEY,
        resource JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS appointments (
        id UUID PRIMARY KEY,
        resource JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )
    "#,
];

/// Creates the tables and indexes if they do not exist.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        query(statement).execute(pool).await.map_err(|e| PostgresError::Schema {
            message: e.to_string(),
        })?;
    }
    info!(statements = SCHEMA.len(), "Database schema ready");
    Ok(())
}
