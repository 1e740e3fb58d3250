//! Storage traits implemented by every backend.

use async_trait::async_trait;
use uuid::Uuid;

use crate::StorageResult;
use crate::types::{Appointment, AppointmentStatus, Message, NewAppointment, NewMessage, NewUser, Role, User};

/// User account storage.
///
/// Implementations must enforce email uniqueness atomically: two concurrent
/// `create` calls with the same email yield exactly one success and one
/// [`StorageError::AlreadyExists`](crate::StorageError::AlreadyExists).
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Finds a user by identifier.
    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<User>>;

    /// Finds a user by exact email match.
    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>>;

    /// Persists a new user.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the email is already taken.
    async fn create(&self, user: NewUser) -> StorageResult<User>;

    /// Lists all users with the given role, oldest first.
    async fn list_by_role(&self, role: Role) -> StorageResult<Vec<User>>;

    /// Lists doctors matching first name, last name and department.
    async fn find_doctors_by_name(
        &self,
        first_name: &str,
        last_name: &str,
        department: &str,
    ) -> StorageResult<Vec<User>>;

    /// Deletes a user.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no user has this id.
    async fn delete(&self, id: Uuid) -> StorageResult<()>;

    /// Finds a user by id, constrained to a role.
    async fn find_by_id_and_role(&self, id: Uuid, role: Role) -> StorageResult<Option<User>> {
        Ok(self.find_by_id(id).await?.filter(|user| user.has_role(role)))
    }
}

/// Contact-form message storage.
#[async_trait]
pub trait MessageStorage: Send + Sync {
    async fn create(&self, message: NewMessage) -> StorageResult<Message>;

    /// Lists all messages, oldest first.
    async fn list(&self) -> StorageResult<Vec<Message>>;
}

/// Appointment storage.
#[async_trait]
pub trait AppointmentStorage: Send + Sync {
    async fn create(&self, appointment: NewAppointment) -> StorageResult<Appointment>;

    /// Lists all appointments, oldest first.
    async fn list(&self) -> StorageResult<Vec<Appointment>>;

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Appointment>>;

    /// Sets the status of an appointment and returns the updated document.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no appointment has this id.
    async fn update_status(&self, id: Uuid, status: AppointmentStatus) -> StorageResult<Appointment>;

    /// # Errors
    ///
    /// Returns `NotFound` if no appointment has this id.
    async fn delete(&self, id: Uuid) -> StorageResult<()>;
}
