//! # carebook-storage
//!
//! Storage abstraction layer for the Carebook server.
//!
//! This crate defines the document types (users, messages, appointments) and
//! the traits every storage backend implements. It contains no backends;
//! see `carebook-db-memory` and `carebook-db-postgres`.
//!
//! ## Example
//!
//! ```ignore
//! use carebook_storage::{Role, UserStorage};
//!
//! async fn doctors(storage: &dyn UserStorage) -> carebook_storage::StorageResult<usize> {
//!     Ok(storage.list_by_role(Role::Doctor).await?.len())
//! }
//! ```

mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, StorageError};
pub use traits::{AppointmentStorage, MessageStorage, UserStorage};
pub use types::{
    Appointment, AppointmentStatus, Avatar, DoctorName, Message, NewAppointment, NewMessage,
    NewUser, ParseEnumError, Role, User,
};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Shareable user storage handle.
pub type DynUserStorage = std::sync::Arc<dyn UserStorage>;

/// Shareable message storage handle.
pub type DynMessageStorage = std::sync::Arc<dyn MessageStorage>;

/// Shareable appointment storage handle.
pub type DynAppointmentStorage = std::sync::Arc<dyn AppointmentStorage>;
