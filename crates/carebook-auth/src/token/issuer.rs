//! Issues a session token and attaches it as a role-scoped cookie.

use std::sync::Arc;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use carebook_storage::User;
use serde::Serialize;

use super::jwt::JwtService;
use super::session_cookie::{CookieSettings, cookie_name_for};
use crate::error::AuthError;

/// Body returned alongside a freshly issued session cookie.
#[derive(Debug, Serialize)]
pub struct TokenResponse<'a> {
    pub success: bool,
    pub message: &'a str,
    pub user: &'a User,
    pub token: &'a str,
}

#[derive(Debug, Clone)]
pub struct TokenIssuer {
    jwt_service: Arc<JwtService>,
    cookies: CookieSettings,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(jwt_service: Arc<JwtService>, cookies: CookieSettings) -> Self {
        Self {
            jwt_service,
            cookies,
        }
    }

    #[must_use]
    pub fn cookies(&self) -> &CookieSettings {
        &self.cookies
    }

    /// Signs a token for `user` and builds the response: the cookie named
    /// for the user's role plus `{success, message, user, token}`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Issue` if the token cannot be encoded.
    pub fn issue(&self, user: &User, message: &str, status: StatusCode) -> Result<Response, AuthError> {
        let token = self.jwt_service.issue(user.id).map_err(AuthError::Issue)?;
        let cookie = self
            .cookies
            .session_cookie(cookie_name_for(user.role), token.clone());
        let jar = CookieJar::default().add(cookie);

        tracing::debug!(user_id = %user.id, role = %user.role, "Issued session token");

        let body = TokenResponse {
            success: true,
            message,
            user,
            token: &token,
        };
        Ok((status, jar, Json(body)).into_response())
    }
}
