//! Authentication and authorization error types.

use carebook_storage::{Role, StorageError};

use crate::token::JwtError;

/// Errors raised while issuing or checking a session.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No session cookie was presented.
    #[error("{} Not Authenticated!", role_label(.role))]
    Unauthenticated {
        /// Role whose cookie was expected. `None` for any-session routes.
        role: Option<Role>,
    },

    /// The token failed signature or expiry verification.
    #[error("Invalid or expired session token!")]
    InvalidToken(#[source] JwtError),

    /// The token is valid but its user no longer exists.
    #[error("User not found!")]
    UserNotFound,

    /// The session user does not have the route's required role.
    #[error("{role} not authorized for this resource!")]
    Forbidden {
        /// Role of the session user.
        role: Role,
    },

    /// Token encoding failed.
    #[error("Failed to issue session token: {0}")]
    Issue(#[source] JwtError),

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Storage lookup failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    #[must_use]
    pub fn unauthenticated(role: Option<Role>) -> Self {
        Self::Unauthenticated { role }
    }

    #[must_use]
    pub fn forbidden(role: Role) -> Self {
        Self::Forbidden { role }
    }

    /// Returns `true` for failures caused by the client's credentials rather
    /// than by the server.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated { .. }
                | Self::InvalidToken(_)
                | Self::UserNotFound
                | Self::Forbidden { .. }
        )
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

fn role_label(role: &Option<Role>) -> &'static str {
    role.as_ref().map_or("User", Role::as_str)
}
