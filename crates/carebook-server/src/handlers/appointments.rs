//! Appointment booking and review.

use axum::Json;
use axum::extract::{Path, State};
use carebook_api::{ApiError, ApiResult, MessageBody};
use carebook_auth::{AdminAuth, PatientAuth};
use carebook_storage::{Appointment, AppointmentStatus, DoctorName, NewAppointment, StorageError};
use serde::{Deserialize, Serialize};

use super::{JsonBody, all_present, parse_id, take};
use crate::state::AppState;

const APPOINTMENT_NOT_FOUND: &str = "Appointment not found!";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub adhar_no: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    #[serde(rename = "appointment_date")]
    pub appointment_date: Option<String>,
    pub department: Option<String>,
    #[serde(rename = "doctor_firstName")]
    pub doctor_first_name: Option<String>,
    #[serde(rename = "doctor_lastName")]
    pub doctor_last_name: Option<String>,
    pub has_visited: Option<bool>,
    pub address: Option<String>,
}

impl AppointmentRequest {
    fn is_complete(&self) -> bool {
        all_present(&[
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
            &self.adhar_no,
            &self.dob,
            &self.gender,
            &self.appointment_date,
            &self.department,
            &self.doctor_first_name,
            &self.doctor_last_name,
            &self.address,
        ])
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AppointmentCreatedResponse {
    pub success: bool,
    pub appointment: Appointment,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AppointmentUpdatedResponse {
    pub success: bool,
    pub message: &'static str,
    pub appointment: Appointment,
}

#[derive(Debug, Serialize)]
pub struct AppointmentsResponse {
    pub success: bool,
    pub appointments: Vec<Appointment>,
}

/// `POST /appointment/post`
pub async fn post_appointment(
    State(state): State<AppState>,
    PatientAuth(patient): PatientAuth,
    JsonBody(req): JsonBody<AppointmentRequest>,
) -> ApiResult<Json<AppointmentCreatedResponse>> {
    if !req.is_complete() {
        return Err(ApiError::validation("Please Fill Full Form!"));
    }

    let doctor = DoctorName {
        first_name: take(req.doctor_first_name),
        last_name: take(req.doctor_last_name),
    };
    let department = take(req.department);

    let mut matches = state
        .users
        .find_doctors_by_name(&doctor.first_name, &doctor.last_name, &department)
        .await?;
    let doctor_id = match matches.len() {
        0 => return Err(ApiError::not_found("Doctor not found!")),
        1 => matches.remove(0).id,
        n => {
            tracing::debug!(candidates = n, department = %department, "Ambiguous doctor name");
            return Err(ApiError::doctor_conflict());
        }
    };

    let appointment = state
        .appointments
        .create(NewAppointment {
            first_name: take(req.first_name),
            last_name: take(req.last_name),
            email: take(req.email),
            phone: take(req.phone),
            adhar_no: take(req.adhar_no),
            dob: take(req.dob),
            gender: take(req.gender),
            appointment_date: take(req.appointment_date),
            department,
            doctor,
            has_visited: req.has_visited.unwrap_or(false),
            address: take(req.address),
            doctor_id,
            patient_id: patient.id,
        })
        .await?;

    tracing::info!(
        appointment_id = %appointment.id,
        patient_id = %patient.id,
        doctor_id = %doctor_id,
        "Appointment booked"
    );

    Ok(Json(AppointmentCreatedResponse {
        success: true,
        appointment,
        message: "Appointment Send!",
    }))
}

/// `GET /appointment/getall`
pub async fn get_all_appointments(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
) -> ApiResult<Json<AppointmentsResponse>> {
    let appointments = state.appointments.list().await?;
    Ok(Json(AppointmentsResponse {
        success: true,
        appointments,
    }))
}

/// `PUT /appointment/update/{id}`
pub async fn update_appointment_status(
    State(state): State<AppState>,
    AdminAuth(admin): AdminAuth,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateStatusRequest>,
) -> ApiResult<Json<AppointmentUpdatedResponse>> {
    let id = parse_id(&id, APPOINTMENT_NOT_FOUND)?;
    if state.appointments.find_by_id(id).await?.is_none() {
        return Err(ApiError::not_found(APPOINTMENT_NOT_FOUND));
    }

    let status = req
        .status
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .parse::<AppointmentStatus>()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let appointment = state
        .appointments
        .update_status(id, status)
        .await
        .map_err(not_found_as(APPOINTMENT_NOT_FOUND))?;

    tracing::info!(appointment_id = %id, status = %status, updated_by = %admin.id, "Appointment status updated");

    Ok(Json(AppointmentUpdatedResponse {
        success: true,
        message: "Appointment Status Updated!",
        appointment,
    }))
}

/// `DELETE /appointment/delete/{id}`
pub async fn delete_appointment(
    State(state): State<AppState>,
    AdminAuth(admin): AdminAuth,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageBody>> {
    let id = parse_id(&id, APPOINTMENT_NOT_FOUND)?;
    state
        .appointments
        .delete(id)
        .await
        .map_err(not_found_as(APPOINTMENT_NOT_FOUND))?;

    tracing::info!(appointment_id = %id, deleted_by = %admin.id, "Appointment deleted");
    Ok(Json(MessageBody::ok("Appointment Deleted!")))
}

fn not_found_as(message: &'static str) -> impl Fn(StorageError) -> ApiError {
    move |err| match err {
        StorageError::NotFound { .. } => ApiError::not_found(message),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_field_names() {
        let req: AppointmentRequest = serde_json::from_value(serde_json::json!({
            "firstName": "Lisa",
            "appointment_date": "2026-11-02",
            "doctor_firstName": "Gregory",
            "doctor_lastName": "House",
            "hasVisited": true
        }))
        .unwrap();
        assert_eq!(req.appointment_date.as_deref(), Some("2026-11-02"));
        assert_eq!(req.doctor_first_name.as_deref(), Some("Gregory"));
        assert_eq!(req.doctor_last_name.as_deref(), Some("House"));
        assert_eq!(req.has_visited, Some(true));
        assert!(!req.is_complete());
    }

    #[test]
    fn test_not_found_mapping() {
        let map = not_found_as(APPOINTMENT_NOT_FOUND);
        let err = map(StorageError::not_found("appointments", "x"));
        assert!(matches!(err, ApiError::NotFound(m) if m == APPOINTMENT_NOT_FOUND));

        let err = map(StorageError::internal("boom"));
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
