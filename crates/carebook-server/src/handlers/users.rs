//! Account handlers: patient registration, login, admin creation and the
//! session "who am I" endpoints.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use carebook_api::{ApiError, ApiResult};
use carebook_auth::password::{hash_password_async, verify_password_async};
use carebook_auth::{AdminAuth, PatientAuth, SessionAuth};
use carebook_storage::{NewUser, Role, StorageError, User};
use serde::{Deserialize, Serialize};

use super::{JsonBody, all_present, take};
use crate::metrics;
use crate::state::AppState;

/// Personal details shared by patient and admin registration.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<String>,
    pub adhar_no: Option<String>,
}

impl RegisterRequest {
    fn is_complete(&self) -> bool {
        all_present(&[
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
            &self.password,
            &self.gender,
            &self.dob,
            &self.adhar_no,
        ])
    }

    fn email(&self) -> String {
        take(self.email.clone())
    }

    /// Hashes the password and builds the account.
    pub(crate) async fn into_new_user(self, role: Role) -> ApiResult<NewUser> {
        let password = self.password.unwrap_or_default();
        let password_hash = hash_password_async(password).await?;
        Ok(NewUser {
            first_name: take(self.first_name),
            last_name: take(self.last_name),
            email: take(self.email),
            phone: take(self.phone),
            gender: take(self.gender),
            dob: take(self.dob),
            adhar_no: take(self.adhar_no),
            role,
            doctor_department: None,
            doc_avatar: None,
            password_hash,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdminCreatedResponse {
    pub success: bool,
    pub message: &'static str,
    pub admin: User,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: User,
}

/// `POST /user/patient/register`
pub async fn patient_register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> ApiResult<Response> {
    if !req.is_complete() {
        return Err(ApiError::validation("Please Fill Full Form!"));
    }
    if state.users.find_by_email(&req.email()).await?.is_some() {
        return Err(ApiError::duplicate_user("User Already Registered!"));
    }

    let new_user = req.into_new_user(Role::Patient).await?;
    // A concurrent registration can still win the race; storage reports it as
    // AlreadyExists which converts to the same duplicate error.
    let user = state.users.create(new_user).await?;

    tracing::info!(user_id = %user.id, role = %user.role, "User registered");
    metrics::record_user_created(user.role.as_str());

    Ok(state.issuer().issue(&user, "User Registered!", StatusCode::OK)?)
}

/// `POST /user/login`
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Response> {
    if !all_present(&[&req.email, &req.password, &req.confirm_password, &req.role]) {
        metrics::record_login("invalid_request");
        return Err(ApiError::validation("Please Provide All Details!"));
    }

    let password = req.password.unwrap_or_default();
    if Some(password.as_str()) != req.confirm_password.as_deref() {
        metrics::record_login("password_mismatch");
        return Err(ApiError::password_mismatch());
    }

    let email = take(req.email);
    let Some(user) = state.users.find_by_email(&email).await? else {
        metrics::record_login("invalid_credentials");
        return Err(ApiError::invalid_credentials());
    };

    if !verify_password_async(password, user.password_hash.clone()).await? {
        metrics::record_login("invalid_credentials");
        return Err(ApiError::invalid_credentials());
    }

    // An unknown role name cannot match the stored role.
    let requested = take(req.role).parse::<Role>().ok();
    if requested != Some(user.role) {
        metrics::record_login("role_mismatch");
        return Err(ApiError::role_mismatch());
    }

    metrics::record_login("success");
    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    Ok(state.issuer().issue(&user, "User Login Successfully!", StatusCode::OK)?)
}

/// `POST /user/admin/addnew`
pub async fn add_new_admin(
    State(state): State<AppState>,
    AdminAuth(creator): AdminAuth,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> ApiResult<Json<AdminCreatedResponse>> {
    if !req.is_complete() {
        return Err(ApiError::validation("Please fill the full form!"));
    }
    if let Some(existing) = state.users.find_by_email(&req.email()).await? {
        return Err(duplicate_admin(existing.role));
    }

    let new_user = req.into_new_user(Role::Admin).await?;
    let admin = match state.users.create(new_user).await {
        Ok(admin) => admin,
        Err(StorageError::AlreadyExists { .. }) => return Err(duplicate_admin(Role::Admin)),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %admin.id, created_by = %creator.id, "Admin created");
    metrics::record_user_created(admin.role.as_str());

    Ok(Json(AdminCreatedResponse {
        success: true,
        message: "New Admin Registered!",
        admin,
    }))
}

fn duplicate_admin(role: Role) -> ApiError {
    ApiError::duplicate_user(format!("{role} Admin With This Email Already Exists!"))
}

/// `GET /user/me`
pub async fn get_user_details(SessionAuth(user): SessionAuth) -> impl IntoResponse {
    user_details(user)
}

/// `GET /user/admin/me`
pub async fn get_admin_details(AdminAuth(user): AdminAuth) -> impl IntoResponse {
    user_details(user)
}

/// `GET /user/patient/me`
pub async fn get_patient_details(PatientAuth(user): PatientAuth) -> impl IntoResponse {
    user_details(user)
}

fn user_details(user: User) -> Json<UserResponse> {
    Json(UserResponse {
        success: true,
        user,
    })
}
