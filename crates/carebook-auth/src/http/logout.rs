//! Logout handlers.
//!
//! Logout overwrites the role's session cookie with an empty one that expires
//! immediately. Tokens are not revoked server-side, and logout succeeds
//! without a valid session.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use crate::middleware::AuthState;
use crate::token::{ADMIN_COOKIE, PATIENT_COOKIE};

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: &'static str,
}

/// `GET /user/admin/logout`
pub async fn logout_admin(State(state): State<AuthState>, jar: CookieJar) -> impl IntoResponse {
    clear_session(&state, jar, ADMIN_COOKIE, "Admin logged out Successfully!")
}

/// `GET /user/patient/logout`
pub async fn logout_patient(State(state): State<AuthState>, jar: CookieJar) -> impl IntoResponse {
    clear_session(&state, jar, PATIENT_COOKIE, "Patient Logged Out Successfully!")
}

fn clear_session(
    state: &AuthState,
    jar: CookieJar,
    name: &'static str,
    message: &'static str,
) -> (StatusCode, CookieJar, Json<LogoutResponse>) {
    tracing::debug!(cookie = %name, "Clearing session cookie");
    let jar = jar.add(state.issuer.cookies().clear_cookie(name));
    (
        StatusCode::CREATED,
        jar,
        Json(LogoutResponse {
            success: true,
            message,
        }),
    )
}
