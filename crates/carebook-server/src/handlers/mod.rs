//! Route handlers.

pub mod appointments;
pub mod doctors;
pub mod health;
pub mod messages;
pub mod users;

use axum::extract::FromRequest;
use carebook_api::ApiError;
use uuid::Uuid;

/// JSON body extractor whose rejection renders as `{success: false, message}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Returns the value when present and non-empty. Values are never trimmed.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Returns `true` when every value is present and non-empty.
pub(crate) fn all_present(values: &[&Option<String>]) -> bool {
    values.iter().all(|v| present(v).is_some())
}

/// Unwraps a field already checked by [`all_present`].
pub(crate) fn take(value: Option<String>) -> String {
    value.unwrap_or_default()
}

/// Parses a path id; malformed ids behave like missing documents.
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(not_found))
}
