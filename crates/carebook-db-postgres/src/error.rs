//! Error types for the PostgreSQL storage backend.

use carebook_storage::StorageError;
use sqlx_core::error::Error as SqlxError;

/// Errors specific to the PostgreSQL storage backend.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    /// Database connection or query error.
    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    /// Schema creation failed.
    #[error("Schema error: {message}")]
    Schema { message: String },
}

pub type Result<T> = std::result::Result<T, PostgresError>;

/// Returns `true` for a unique-constraint violation (23505).
pub(crate) fn is_unique_violation(err: &SqlxError) -> bool {
    matches!(err, SqlxError::Database(db_err) if db_err.is_unique_violation())
}

impl From<PostgresError> for StorageError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::Database(e) => sqlx_to_storage(e),
            PostgresError::Schema { message } => StorageError::internal(message),
        }
    }
}

pub(crate) fn sqlx_to_storage(err: SqlxError) -> StorageError {
    match err {
        SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) | SqlxError::Tls(_) => {
            StorageError::connection_error(err.to_string())
        }
        SqlxError::ColumnDecode { .. } | SqlxError::Decode(_) => {
            StorageError::invalid_document(err.to_string())
        }
        _ => StorageError::internal(err.to_string()),
    }
}
