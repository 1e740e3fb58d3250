//! `carebook-storage` trait implementations over JSONB tables.

use async_trait::async_trait;
use carebook_storage::{
    Appointment, AppointmentStatus, AppointmentStorage, Message, MessageStorage, NewAppointment,
    NewMessage, NewUser, Role, StorageError, StorageResult, User, UserStorage,
};
use serde_json::Value;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;
use uuid::Uuid;

use crate::config::PostgresConfig;
use crate::error::{Result, is_unique_violation, sqlx_to_storage};
use crate::pool::create_pool;
use crate::schema::init_schema;

/// PostgreSQL-backed storage for users, messages and appointments.
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Connects, then creates the schema if missing.
    pub async fn new(config: PostgresConfig) -> Result<Self> {
        let pool = create_pool(&config).await?;
        init_schema(&pool).await?;
        Ok(Self { pool })
    }
}

type UserRow = (Value, String);

fn decode_user((resource, password_hash): UserRow) -> StorageResult<User> {
    let mut user: User = serde_json::from_value(resource)?;
    user.password_hash = password_hash;
    Ok(user)
}

fn decode_users(rows: Vec<UserRow>) -> StorageResult<Vec<User>> {
    rows.into_iter().map(decode_user).collect()
}

fn decode_documents<T: serde::de::DeserializeOwned>(rows: Vec<(Value,)>) -> StorageResult<Vec<T>> {
    rows.into_iter()
        .map(|(resource,)| serde_json::from_value(resource).map_err(StorageError::from))
        .collect()
}

#[async_trait]
impl UserStorage for PostgresStorage {
    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<User>> {
        let row: Option<UserRow> =
            query_as("SELECT resource, password_hash FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(sqlx_to_storage)?;
        row.map(decode_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let row: Option<UserRow> =
            query_as("SELECT resource, password_hash FROM users WHERE resource->>'email' = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(sqlx_to_storage)?;
        row.map(decode_user).transpose()
    }

    async fn create(&self, user: NewUser) -> StorageResult<User> {
        let user = user.into_user();
        let resource = serde_json::to_value(&user)?;

        query(
            r#"
            INSERT INTO users (id, resource, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.id)
        .bind(&resource)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return StorageError::already_exists("users", user.email.clone());
            }
            sqlx_to_storage(e)
        })?;

        tracing::debug!(user_id = %user.id, role = %user.role, "Inserted user");
        Ok(user)
    }

    async fn list_by_role(&self, role: Role) -> StorageResult<Vec<User>> {
        let rows: Vec<UserRow> = query_as(
            r#"
            SELECT resource, password_hash FROM users
            WHERE resource->>'role' = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_to_storage)?;
        decode_users(rows)
    }

    async fn find_doctors_by_name(
        &self,
        first_name: &str,
        last_name: &str,
        department: &str,
    ) -> StorageResult<Vec<User>> {
        let rows: Vec<UserRow> = query_as(
            r#"
            SELECT resource, password_hash FROM users
            WHERE resource->>'role' = 'Doctor'
              AND resource->>'firstName' = $1
              AND resource->>'lastName' = $2
              AND resource->>'doctorDepartment' = $3
            ORDER BY created_at, id
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(department)
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_to_storage)?;
        decode_users(rows)
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        let result = query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(sqlx_to_storage)?;
        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("users", id.to_string()));
        }
        Ok(())
    }

    async fn find_by_id_and_role(&self, id: Uuid, role: Role) -> StorageResult<Option<User>> {
        let row: Option<UserRow> = query_as(
            "SELECT resource, password_hash FROM users WHERE id = $1 AND resource->>'role' = $2",
        )
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(sqlx_to_storage)?;
        row.map(decode_user).transpose()
    }
}

#[async_trait]
impl MessageStorage for PostgresStorage {
    async fn create(&self, message: NewMessage) -> StorageResult<Message> {
        let message = message.into_message();
        let resource = serde_json::to_value(&message)?;
        query("INSERT INTO messages (id, resource, created_at) VALUES ($1, $2, $3)")
            .bind(message.id)
            .bind(&resource)
            .bind(message.created_at)
            .execute(&self.pool)
            .await
            .map_err(sqlx_to_storage)?;
        Ok(message)
    }

    async fn list(&self) -> StorageResult<Vec<Message>> {
        let rows: Vec<(Value,)> = query_as("SELECT resource FROM messages ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await
            .map_err(sqlx_to_storage)?;
        decode_documents(rows)
    }
}

#[async_trait]
impl AppointmentStorage for PostgresStorage {
    async fn create(&self, appointment: NewAppointment) -> StorageResult<Appointment> {
        let appointment = appointment.into_appointment();
        let resource = serde_json::to_value(&appointment)?;
        query("INSERT INTO appointments (id, resource, created_at) VALUES ($1, $2, $3)")
            .bind(appointment.id)
            .bind(&resource)
            .bind(appointment.created_at)
            .execute(&self.pool)
            .await
            .map_err(sqlx_to_storage)?;
        Ok(appointment)
    }

    async fn list(&self) -> StorageResult<Vec<Appointment>> {
        let rows: Vec<(Value,)> =
            query_as("SELECT resource FROM appointments ORDER BY created_at, id")
                .fetch_all(&self.pool)
                .await
                .map_err(sqlx_to_storage)?;
        decode_documents(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Appointment>> {
        let row: Option<(Value,)> = query_as("SELECT resource FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(sqlx_to_storage)?;
        row.map(|(resource,)| serde_json::from_value(resource).map_err(StorageError::from))
            .transpose()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> StorageResult<Appointment> {
        let row: Option<(Value,)> = query_as(
            r#"
            UPDATE appointments
            SET resource = jsonb_set(resource, '{status}', to_jsonb($2::text))
            WHERE id = $1
            RETURNING resource
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(sqlx_to_storage)?;

        let (resource,) = row.ok_or_else(|| StorageError::not_found("appointments", id.to_string()))?;
        Ok(serde_json::from_value(resource)?)
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        let result = query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(sqlx_to_storage)?;
        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("appointments", id.to_string()));
        }
        Ok(())
    }
}
