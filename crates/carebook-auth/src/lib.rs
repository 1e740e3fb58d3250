//! # carebook-auth
//!
//! Authentication and role-based authorization for the Carebook server.
//!
//! - [`token`]: HS256 session tokens and the role-scoped session cookies
//!   (`adminToken`, `patientToken`) that carry them.
//! - [`middleware`]: axum extractors that resolve a session cookie to a stored
//!   user and enforce the route's required role.
//! - [`password`]: Argon2id password hashing.
//! - [`http`]: logout handlers.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod password;
pub mod token;

pub use config::{AuthConfig, SameSitePolicy};
pub use error::{AuthError, AuthResult};
pub use middleware::{AdminAuth, AuthState, PatientAuth, SessionAuth};
pub use token::{JwtService, SessionClaims, TokenIssuer};
