//! # carebook-server
//!
//! HTTP server for the Carebook hospital backend: patient registration and
//! login, admin-managed doctor accounts with avatar uploads, contact messages
//! and appointment booking.

pub mod config;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod observability;
pub mod server;
pub mod state;

pub use config::{AppConfig, LoggingConfig, ServerConfig, StorageBackend, StorageConfig};
pub use observability::init_tracing;
pub use server::{CarebookServer, ServerBuilder, build_app, build_router, build_state};
pub use state::AppState;
