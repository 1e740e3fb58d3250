//! Cookie session extractors.
//!
//! ```ignore
//! async fn handler(AdminAuth(admin): AdminAuth) -> String {
//!     format!("Hello, {}!", admin.first_name)
//! }
//! ```

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use carebook_storage::{DynUserStorage, Role, User};

use crate::error::{AuthError, AuthResult};
use crate::token::{ADMIN_COOKIE, JwtService, PATIENT_COOKIE, TokenIssuer};

// =============================================================================
// Auth State
// =============================================================================

/// State required by the session extractors.
///
/// Include it in the application state and expose it with `FromRef`.
#[derive(Clone)]
pub struct AuthState {
    /// Verifies session tokens.
    pub jwt_service: Arc<JwtService>,

    /// Resolves token subjects to users.
    pub user_storage: DynUserStorage,

    /// Signs tokens and builds session cookies.
    pub issuer: TokenIssuer,
}

impl AuthState {
    pub fn new(jwt_service: Arc<JwtService>, user_storage: DynUserStorage, issuer: TokenIssuer) -> Self {
        Self {
            jwt_service,
            user_storage,
            issuer,
        }
    }

    /// Resolves the session held in cookie `name`.
    ///
    /// `None` means the cookie is absent or empty.
    async fn resolve(&self, jar: &CookieJar, name: &str) -> AuthResult<Option<User>> {
        let Some(token) = jar.get(name).map(|c| c.value()).filter(|v| !v.is_empty()) else {
            return Ok(None);
        };

        let claims = self.jwt_service.verify(token).map_err(|e| {
            tracing::debug!(cookie = %name, error = %e, "Rejected session token");
            AuthError::InvalidToken(e)
        })?;

        match self.user_storage.find_by_id(claims.id).await? {
            Some(user) => Ok(Some(user)),
            None => {
                tracing::debug!(user_id = %claims.id, "Session user no longer exists");
                Err(AuthError::UserNotFound)
            }
        }
    }

    async fn require(&self, parts: &Parts, name: &str, role: Role) -> AuthResult<User> {
        let jar = CookieJar::from_headers(&parts.headers);
        let user = self
            .resolve(&jar, name)
            .await?
            .ok_or_else(|| AuthError::unauthenticated(Some(role)))?;

        if !user.has_role(role) {
            tracing::warn!(user_id = %user.id, role = %user.role, required = %role, "Role check failed");
            return Err(AuthError::forbidden(user.role));
        }
        Ok(user)
    }
}

// =============================================================================
// Extractors
// =============================================================================

/// Requires an admin session (`adminToken` cookie, role Admin).
pub struct AdminAuth(pub User);

impl<S> FromRequestParts<S> for AdminAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        auth_state
            .require(parts, ADMIN_COOKIE, Role::Admin)
            .await
            .map(AdminAuth)
    }
}

/// Requires a patient session (`patientToken` cookie, role Patient).
pub struct PatientAuth(pub User);

impl<S> FromRequestParts<S> for PatientAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        auth_state
            .require(parts, PATIENT_COOKIE, Role::Patient)
            .await
            .map(PatientAuth)
    }
}

/// Accepts any valid session: `adminToken` first, then `patientToken`.
pub struct SessionAuth(pub User);

impl<S> FromRequestParts<S> for SessionAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        // A failing cookie does not hide a valid one that follows it.
        let mut first_error = None;
        for name in [ADMIN_COOKIE, PATIENT_COOKIE] {
            match auth_state.resolve(&jar, name).await {
                Ok(Some(user)) => return Ok(SessionAuth(user)),
                Ok(None) => {}
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        Err(first_error.unwrap_or_else(|| AuthError::unauthenticated(None)))
    }
}

// =============================================================================
// Tests
// =============================================================================
