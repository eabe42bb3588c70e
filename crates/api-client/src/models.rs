//! Wire records exchanged with the clinic backend.
//!
//! Records are plain data: this crate never mints identifiers or mutates them beyond what a
//! request body needs. Field names follow the backend's camelCase JSON.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Reads an explicit `null` as the field's default, the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A doctor as listed by `/doctor` and accepted by `POST /doctor/{token}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, alias = "specialization", deserialize_with = "null_as_default")]
    pub specialty: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    /// Only sent when creating a doctor; never rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, alias = "availableTime", deserialize_with = "null_as_default")]
    pub available_times: Vec<String>,
}

/// A patient record as returned by `/patient/{token}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Only sent on signup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Appointment status as stored by the backend.
pub const STATUS_SCHEDULED: i32 = 0;
pub const STATUS_COMPLETED: i32 = 1;

/// A flattened appointment as returned by the appointment and patient endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub patient_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub patient_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub patient_phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub patient_email: String,
    #[serde(default)]
    pub doctor_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub doctor_name: String,
    #[serde(default)]
    pub appointment_time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: i32,
}

impl Appointment {
    /// Derives the patient view record used by the doctor's appointment table.
    pub fn patient(&self) -> PatientSummary {
        PatientSummary {
            id: self.patient_id,
            name: self.patient_name.clone(),
            phone: self.patient_phone.clone(),
            email: self.patient_email.clone(),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.appointment_time.map(|t| t.date())
    }

    pub fn status_label(&self) -> &'static str {
        match self.status {
            STATUS_SCHEDULED => "Scheduled",
            STATUS_COMPLETED => "Completed",
            _ => "Unknown",
        }
    }
}

/// The patient fields shown in a doctor's appointment table row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: Option<i64>,
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// Identifier-only reference used inside booking requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    pub id: i64,
}

/// Body for `POST /appointments/{token}` and `PUT /appointments/{token}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub doctor: RecordRef,
    pub patient: RecordRef,
    pub appointment_time: NaiveDateTime,
    #[serde(default)]
    pub status: i32,
}

/// A prescription attached to an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub patient_name: String,
    pub appointment_id: i64,
    pub medication: String,
    pub dosage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_notes: Option<String>,
}

/// Admin login body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

/// Doctor login body. `identifier` is the doctor's email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorCredentials {
    pub identifier: String,
    pub password: String,
}

/// Patient login body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientCredentials {
    pub email: String,
    pub password: String,
}

/// Normalised outcome of a mutating request.
///
/// `success` mirrors the transport-level "response OK" status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Body of a token-bearing login response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenBody {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl MessageBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.message.or(self.error).filter(|m| !m.trim().is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DoctorsBody {
    #[serde(default)]
    pub doctors: Vec<Doctor>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PatientBody {
    #[serde(default)]
    pub patient: Option<Patient>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AppointmentsBody {
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

/// The doctor's appointment endpoint answers with a bare array; older deployments wrap it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum AppointmentList {
    Bare(Vec<Appointment>),
    Wrapped(AppointmentsBody),
}

impl AppointmentList {
    pub(crate) fn into_vec(self) -> Vec<Appointment> {
        match self {
            AppointmentList::Bare(list) => list,
            AppointmentList::Wrapped(body) => body.appointments,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum AvailabilityBody {
    Bare(Vec<String>),
    Wrapped {
        #[serde(rename = "availableTimes", alias = "availableTime")]
        available_times: Vec<String>,
    },
}

impl AvailabilityBody {
    pub(crate) fn into_vec(self) -> Vec<String> {
        match self {
            AvailabilityBody::Bare(list) => list,
            AvailabilityBody::Wrapped { available_times } => available_times,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PrescriptionBody {
    Wrapped { prescription: Prescription },
    Bare(Prescription),
}

impl PrescriptionBody {
    pub(crate) fn into_inner(self) -> Prescription {
        match self {
            PrescriptionBody::Wrapped { prescription } => prescription,
            PrescriptionBody::Bare(prescription) => prescription,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doctor_accepts_both_specialty_spellings() {
        let a: Doctor = serde_json::from_str(
            r#"{"id":1,"name":"Ann","specialization":"Cardiology","email":"a@x.test","availableTimes":["09:00 AM"]}"#,
        )
        .expect("parse doctor");
        let b: Doctor = serde_json::from_str(
            r#"{"id":1,"name":"Ann","specialty":"Cardiology","email":"a@x.test","availableTime":["09:00 AM"]}"#,
        )
        .expect("parse doctor");
        assert_eq!(a, b);
        assert_eq!(a.available_times, vec!["09:00 AM".to_string()]);
    }

    #[test]
    fn doctor_without_password_omits_it_on_the_wire() {
        let doctor = Doctor {
            name: "Ann".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&doctor).expect("serialize");
        assert!(json.get("password").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn appointment_derives_patient_summary() {
        let appt: Appointment = serde_json::from_str(
            r#"{"id":7,"patientId":1,"patientName":"A","patientPhone":"555","patientEmail":"a@x.test","appointmentTime":"2024-01-01T10:00:00","status":0}"#,
        )
        .expect("parse appointment");
        let patient = appt.patient();
        assert_eq!(patient.id, Some(1));
        assert_eq!(patient.name, "A");
        assert_eq!(patient.phone, "555");
        assert_eq!(patient.email, "a@x.test");
        assert_eq!(appt.date(), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(appt.status_label(), "Scheduled");
    }

    #[test]
    fn appointment_list_accepts_bare_and_wrapped() {
        let bare: AppointmentList = serde_json::from_str(r#"[{"patientName":"A"}]"#).unwrap();
        let wrapped: AppointmentList =
            serde_json::from_str(r#"{"appointments":[{"patientName":"A"}]}"#).unwrap();
        assert_eq!(bare.into_vec().len(), 1);
        assert_eq!(wrapped.into_vec().len(), 1);
    }

    #[test]
    fn null_fields_read_as_empty_and_keep_the_listing() {
        let body: DoctorsBody = serde_json::from_str(
            r#"{"doctors":[
                {"id":1,"name":"Ann","specialty":"Cardiology","email":"a@x.test","phone":"555","availableTimes":["09:00 AM"]},
                {"id":2,"name":"Ben","specialty":null,"email":null,"phone":null,"availableTimes":null}
            ]}"#,
        )
        .expect("parse doctors");
        assert_eq!(body.doctors.len(), 2);
        assert_eq!(body.doctors[1].name, "Ben");
        assert_eq!(body.doctors[1].phone, "");
        assert!(body.doctors[1].available_times.is_empty());

        let list: AppointmentList = serde_json::from_str(
            r#"[{"id":3,"patientId":1,"patientName":"A","patientPhone":null,"patientEmail":null,"doctorName":null,"status":null}]"#,
        )
        .expect("parse appointments");
        let appointments = list.into_vec();
        assert_eq!(appointments.len(), 1);
        assert_eq!(appointments[0].patient().phone, "");
        assert_eq!(appointments[0].status_label(), "Scheduled");
    }

    #[test]
    fn message_body_prefers_message_over_error() {
        let body: MessageBody =
            serde_json::from_str(r#"{"message":"ok","error":"bad"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("ok"));

        let body: MessageBody = serde_json::from_str(r#"{"error":"bad"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("bad"));
    }
}
