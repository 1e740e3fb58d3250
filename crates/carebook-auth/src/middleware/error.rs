//! HTTP rendering of authentication errors.

use axum::response::{IntoResponse, Response};
use carebook_api::ApiError;

use crate::error::AuthError;

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::Unauthenticated { .. } => ApiError::unauthenticated(message),
            AuthError::InvalidToken(_) => ApiError::invalid_token(message),
            AuthError::UserNotFound => ApiError::user_not_found(message),
            AuthError::Forbidden { .. } => ApiError::forbidden(message),
            AuthError::Issue(_) | AuthError::PasswordHash(_) | AuthError::Storage(_) => {
                ApiError::internal(message)
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if !self.is_client_error() {
            tracing::error!(error = %self, "Session check failed");
        }
        ApiError::from(self).into_response()
    }
}
