use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use carebook_storage::StorageError;
use serde::Serialize;
use thiserror::Error;

/// Generic text sent to clients in place of internal error details.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

// -------------------------
// Response envelope
// -------------------------

/// Body of every error response: `{"success": false, "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

/// Body of responses that carry only a confirmation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageBody {
    pub success: bool,
    pub message: String,
}

impl MessageBody {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

// -------------------------
// Errors
// -------------------------

/// Client-facing API errors. Each variant carries the message sent to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    DuplicateUser(String),
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("{0}")]
    PasswordMismatch(String),
    #[error("{0}")]
    RoleMismatch(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    InvalidToken(String),
    #[error("{0}")]
    UserNotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    DoctorConflict(String),
    #[error("{0}")]
    UploadFailed(String),
    #[error("{0}")]
    UnsupportedFormat(String),
    #[error("{0}")]
    MissingAvatar(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
    pub fn duplicate_user(msg: impl Into<String>) -> Self {
        Self::DuplicateUser(msg.into())
    }
    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials("Invalid Password or Email!".into())
    }
    pub fn password_mismatch() -> Self {
        Self::PasswordMismatch("Password and Confirm Password Do Not Match !".into())
    }
    pub fn role_mismatch() -> Self {
        Self::RoleMismatch("User With This Role Not found!".into())
    }
    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::InvalidToken(msg.into())
    }
    pub fn user_not_found(msg: impl Into<String>) -> Self {
        Self::UserNotFound(msg.into())
    }
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
    pub fn doctor_conflict() -> Self {
        Self::DoctorConflict("Doctors Conflict! Please Contact Through Email Or Phone!".into())
    }
    pub fn upload_failed(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }
    pub fn unsupported_format() -> Self {
        Self::UnsupportedFormat("File Format Not Supported!".into())
    }
    pub fn missing_avatar() -> Self {
        Self::MissingAvatar("Doctor Avatar Required!".into())
    }
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UploadFailed(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_)
            | ApiError::DuplicateUser(_)
            | ApiError::InvalidCredentials(_)
            | ApiError::PasswordMismatch(_)
            | ApiError::RoleMismatch(_)
            | ApiError::Unauthenticated(_)
            | ApiError::InvalidToken(_)
            | ApiError::UserNotFound(_)
            | ApiError::DoctorConflict(_)
            | ApiError::UnsupportedFormat(_)
            | ApiError::MissingAvatar(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message placed in the response body. Internal details never leave the server.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let ApiError::Internal(detail) = &self {
            tracing::error!(error = %detail, "internal error while handling request");
        }
        let body = ErrorBody {
            success: false,
            message: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Storage failures at the handler boundary. Handlers that expect
/// `AlreadyExists` or `NotFound` map those themselves with a domain message.
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::AlreadyExists { .. } => {
                ApiError::duplicate_user("User Already Registered!")
            }
            StorageError::NotFound { .. } => ApiError::not_found(err.to_string()),
            other => ApiError::internal(other.to_string()),
        }
    }
}

/// Malformed or mistyped JSON bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
