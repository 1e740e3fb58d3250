//! In-memory storage backend for the Carebook server.
//!
//! Implements the `carebook-storage` traits on papaya lock-free maps. Data
//! lives for the lifetime of the process; intended for development and tests.
//!
//! # Example
//!
//! ```ignore
//! use carebook_db_memory::InMemoryStorage;
//! use carebook_storage::UserStorage;
//!
//! let storage = InMemoryStorage::new();
//! let user = UserStorage::create(&storage, new_user).await?;
//! ```

mod storage;

pub use storage::InMemoryStorage;
