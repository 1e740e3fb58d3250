//! Session extractors for axum handlers.

mod auth;
mod error;

pub use auth::{AdminAuth, AuthState, PatientAuth, SessionAuth};
