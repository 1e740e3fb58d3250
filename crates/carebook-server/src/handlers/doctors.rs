//! Doctor lifecycle: creation with an avatar upload, listing and deletion.

use axum::Json;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, Path, State};
use carebook_api::{ApiError, ApiResult, MessageBody};
use carebook_auth::AdminAuth;
use carebook_media::{AvatarFormat, AvatarUpload};
use carebook_storage::{Avatar, Role, StorageError, User};
use serde::Serialize;

use super::users::RegisterRequest;
use super::{all_present, parse_id, present, take};
use crate::metrics;
use crate::state::AppState;

const AVATAR_FIELD: &str = "docAvatar";
const DOCTOR_NOT_FOUND: &str = "Doctor not found!";

#[derive(Debug, Serialize)]
pub struct DoctorCreatedResponse {
    pub success: bool,
    pub message: &'static str,
    pub doctor: User,
}

#[derive(Debug, Serialize)]
pub struct DoctorsResponse {
    pub success: bool,
    pub doctors: Vec<User>,
}

/// Avatar part of the multipart form, before its content type is checked.
struct AvatarPart {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct DoctorForm {
    details: RegisterRequest,
    doctor_department: Option<String>,
    avatar: Option<AvatarPart>,
}

impl DoctorForm {
    async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            if name == AVATAR_FIELD {
                form.avatar = Some(read_avatar(field).await?);
                continue;
            }
            let value = Some(field.text().await.map_err(multipart_error)?);
            let details = &mut form.details;
            match name.as_str() {
                "firstName" => details.first_name = value,
                "lastName" => details.last_name = value,
                "email" => details.email = value,
                "phone" => details.phone = value,
                "password" => details.password = value,
                "gender" => details.gender = value,
                "dob" => details.dob = value,
                "adharNo" => details.adhar_no = value,
                "doctorDepartment" => form.doctor_department = value,
                other => tracing::debug!(field = %other, "Ignoring unknown form field"),
            }
        }
        Ok(form)
    }

    fn is_complete(&self) -> bool {
        let d = &self.details;
        all_present(&[
            &d.first_name,
            &d.last_name,
            &d.email,
            &d.phone,
            &d.password,
            &d.gender,
            &d.dob,
            &d.adhar_no,
            &self.doctor_department,
        ])
    }
}

async fn read_avatar(field: Field<'_>) -> ApiResult<AvatarPart> {
    let file_name = field.file_name().unwrap_or("avatar").to_string();
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await.map_err(multipart_error)?.to_vec();
    Ok(AvatarPart {
        file_name,
        content_type,
        bytes,
    })
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::validation(err.body_text())
}

fn duplicate_doctor(role: Role) -> ApiError {
    ApiError::duplicate_user(format!("{role} already registered with this email!"))
}

/// `POST /user/doctor/addnew`
pub async fn add_new_doctor(
    State(state): State<AppState>,
    AdminAuth(creator): AdminAuth,
    multipart: Multipart,
) -> ApiResult<Json<DoctorCreatedResponse>> {
    let mut form = DoctorForm::read(multipart).await?;

    let Some(avatar) = form.avatar.take().filter(|a| !a.bytes.is_empty()) else {
        return Err(ApiError::missing_avatar());
    };
    let format = avatar
        .content_type
        .as_deref()
        .and_then(AvatarFormat::from_content_type)
        .ok_or_else(ApiError::unsupported_format)?;

    if !form.is_complete() {
        return Err(ApiError::validation("Please Provide Full Details!"));
    }
    let department = present(&form.doctor_department).map(str::to_string);
    let email = take(form.details.email.clone());
    if let Some(existing) = state.users.find_by_email(&email).await? {
        return Err(duplicate_doctor(existing.role));
    }

    let upload = AvatarUpload {
        file_name: avatar.file_name,
        format,
        bytes: avatar.bytes,
    };
    let blob = state.blobs.upload(upload).await.map_err(|e| {
        tracing::error!(error = %e, "Avatar upload failed");
        ApiError::upload_failed("Failed To Upload Doctor Avatar To Cloudinary")
    })?;

    let mut new_user = form.details.into_new_user(Role::Doctor).await?;
    new_user.doctor_department = department;
    new_user.doc_avatar = Some(Avatar {
        public_id: blob.public_id.clone(),
        url: blob.url,
    });

    let doctor = match state.users.create(new_user).await {
        Ok(doctor) => doctor,
        Err(err) => {
            // The avatar is already stored; remove it so it does not dangle.
            discard_avatar(&state, &blob.public_id).await;
            return Err(match err {
                StorageError::AlreadyExists { .. } => duplicate_doctor(Role::Doctor),
                other => other.into(),
            });
        }
    };

    tracing::info!(
        user_id = %doctor.id,
        created_by = %creator.id,
        department = ?doctor.doctor_department,
        "Doctor created"
    );
    metrics::record_user_created(doctor.role.as_str());

    Ok(Json(DoctorCreatedResponse {
        success: true,
        message: "New Doctor Registered!",
        doctor,
    }))
}

/// `GET /user/doctors`
pub async fn get_all_doctors(State(state): State<AppState>) -> ApiResult<Json<DoctorsResponse>> {
    let doctors = state.users.list_by_role(Role::Doctor).await?;
    Ok(Json(DoctorsResponse {
        success: true,
        doctors,
    }))
}

/// `DELETE /user/doctor/{id}`
pub async fn delete_doctor(
    State(state): State<AppState>,
    AdminAuth(admin): AdminAuth,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageBody>> {
    let id = parse_id(&id, DOCTOR_NOT_FOUND)?;
    let Some(doctor) = state.users.find_by_id_and_role(id, Role::Doctor).await? else {
        return Err(ApiError::not_found(DOCTOR_NOT_FOUND));
    };

    if let Some(avatar) = &doctor.doc_avatar {
        discard_avatar(&state, &avatar.public_id).await;
    }

    match state.users.delete(doctor.id).await {
        Ok(()) => {}
        Err(StorageError::NotFound { .. }) => return Err(ApiError::not_found(DOCTOR_NOT_FOUND)),
        Err(e) => return Err(e.into()),
    }

    tracing::info!(user_id = %doctor.id, deleted_by = %admin.id, "Doctor deleted");
    Ok(Json(MessageBody::ok("Doctor deleted successfully!")))
}

/// Deletes an avatar; failures are logged and counted, never returned.
async fn discard_avatar(state: &AppState, public_id: &str) {
    if let Err(e) = state.blobs.destroy(public_id).await {
        tracing::warn!(error = %e, public_id = %public_id, "Failed to delete avatar from blob store");
        metrics::record_blob_cleanup_failure();
    }
}
