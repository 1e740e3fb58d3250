//! Document types persisted by storage backends.
//!
//! Field names on the wire follow the camelCase shape the web clients expect,
//! with `_id` as the document identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Error returned when parsing a closed enumeration from a string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

// =============================================================================
// Role
// =============================================================================

/// Role of a user account. Gates which endpoints a user may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    /// Returns the role name as stored and sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Doctor => "Doctor",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Patient" => Ok(Self::Patient),
            "Doctor" => Ok(Self::Doctor),
            "Admin" => Ok(Self::Admin),
            other => Err(ParseEnumError {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// Reference to an avatar image held by the blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    /// Opaque identifier assigned by the blob store.
    pub public_id: String,
    /// Public URL of the stored image.
    pub url: String,
}

/// A user account: patient, doctor or admin.
///
/// The password hash is never part of the serialized document. Backends
/// store it beside the document and put it back on reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub dob: String,
    pub adhar_no: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_avatar: Option<Avatar>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Argon2 PHC string.
    #[serde(skip)]
    pub password_hash: String,
}

impl User {
    /// Returns `true` if the user has the given role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

/// A user that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub dob: String,
    pub adhar_no: String,
    pub role: Role,
    pub doctor_department: Option<String>,
    pub doc_avatar: Option<Avatar>,
    pub password_hash: String,
}

impl NewUser {
    /// Assigns an identifier and creation time.
    #[must_use]
    pub fn into_user(self) -> User {
        User {
            id: Uuid::new_v4(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            gender: self.gender,
            dob: self.dob,
            adhar_no: self.adhar_no,
            role: self.role,
            doctor_department: self.doctor_department,
            doc_avatar: self.doc_avatar,
            created_at: OffsetDateTime::now_utc(),
            password_hash: self.password_hash,
        }
    }
}

// =============================================================================
// Message
// =============================================================================

/// A contact-form message left on the public site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl NewMessage {
    #[must_use]
    pub fn into_message(self) -> Message {
        Message {
            id: Uuid::new_v4(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            message: self.message,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

// =============================================================================
// Appointment
// =============================================================================

/// Review state of an appointment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl AppointmentStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Accepted" => Ok(Self::Accepted),
            "Rejected" => Ok(Self::Rejected),
            other => Err(ParseEnumError {
                kind: "appointment status",
                value: other.to_string(),
            }),
        }
    }
}

/// Name of the doctor an appointment was booked with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorName {
    pub first_name: String,
    pub last_name: String,
}

/// An appointment booked by a patient with a doctor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub adhar_no: String,
    pub dob: String,
    pub gender: String,
    #[serde(rename = "appointment_date")]
    pub appointment_date: String,
    pub department: String,
    pub doctor: DoctorName,
    pub has_visited: bool,
    pub address: String,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub status: AppointmentStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub adhar_no: String,
    pub dob: String,
    pub gender: String,
    pub appointment_date: String,
    pub department: String,
    pub doctor: DoctorName,
    pub has_visited: bool,
    pub address: String,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
}

impl NewAppointment {
    /// Assigns an identifier and creation time; new appointments start `Pending`.
    #[must_use]
    pub fn into_appointment(self) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            adhar_no: self.adhar_no,
            dob: self.dob,
            gender: self.gender,
            appointment_date: self.appointment_date,
            department: self.department,
            doctor: self.doctor,
            has_visited: self.has_visited,
            address: self.address,
            doctor_id: self.doctor_id,
            patient_id: self.patient_id,
            status: AppointmentStatus::Pending,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}
