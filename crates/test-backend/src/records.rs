//! Records held by the fake backend.
//!
//! These deliberately do not reuse the client's wire types so that tests exercise the real
//! JSON shapes rather than a shared struct.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "specialization")]
    pub specialty: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default, alias = "availableTime")]
    pub available_times: Vec<String>,
}

impl DoctorRecord {
    pub fn new(id: i64, name: &str, specialty: &str, email: &str) -> Self {
        Self {
            id,
            name: name.into(),
            specialty: specialty.into(),
            email: email.into(),
            password: Some("doctor123".into()),
            phone: "5550000000".into(),
            available_times: Vec::new(),
        }
    }

    pub fn with_times(mut self, times: &[&str]) -> Self {
        self.available_times = times.iter().map(|t| t.to_string()).collect();
        self
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
}

impl PatientRecord {
    pub fn new(id: i64, name: &str, email: &str, password: &str) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            password: Some(password.into()),
            phone: format!("555{id:07}"),
            address: None,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRecord {
    pub id: i64,
    pub patient_id: i64,
    pub patient_name: String,
    pub patient_phone: String,
    pub patient_email: String,
    pub doctor_id: i64,
    pub doctor_name: String,
    /// ISO local date-time, e.g. `2024-01-01T10:00:00`.
    pub appointment_time: String,
    pub status: i32,
}

impl AppointmentRecord {
    /// Builds an appointment between `doctor` and `patient` at `time`.
    pub fn between(
        id: i64,
        doctor: &DoctorRecord,
        patient: &PatientRecord,
        time: &str,
        status: i32,
    ) -> Self {
        Self {
            id,
            patient_id: patient.id,
            patient_name: patient.name.clone(),
            patient_phone: patient.phone.clone(),
            patient_email: patient.email.clone(),
            doctor_id: doctor.id,
            doctor_name: doctor.name.clone(),
            appointment_time: time.into(),
            status,
        }
    }

    pub(crate) fn date(&self) -> &str {
        self.appointment_time
            .split('T')
            .next()
            .unwrap_or(self.appointment_time.as_str())
    }
}

/// Initial contents of a [`crate::FakeBackend`].
#[derive(Clone, Debug, Default)]
pub struct Seed {
    pub doctors: Vec<DoctorRecord>,
    pub patients: Vec<PatientRecord>,
    pub appointments: Vec<AppointmentRecord>,
    pub prescriptions: Vec<Value>,
}

impl Seed {
    /// A small clinic: three doctors, two patients and appointments on `2024-01-01`.
    pub fn clinic() -> Self {
        let grey = DoctorRecord::new(1, "Meredith Grey", "Cardiology", "grey@clinic.test")
            .with_times(&["09:00 AM", "10:00 AM"]);
        let shepherd =
            DoctorRecord::new(2, "Derek Shepherd", "Neurology", "shepherd@clinic.test")
                .with_times(&["02:00 PM", "03:00 PM"]);
        let bailey = DoctorRecord::new(3, "Miranda Bailey", "Cardiology", "bailey@clinic.test");

        let alice = PatientRecord::new(1, "Alice Smith", "alice@mail.test", "secret1");
        let bob = PatientRecord::new(2, "Bob Jones", "bob@mail.test", "secret2");

        let appointments = vec![
            AppointmentRecord::between(1, &grey, &alice, "2024-01-01T09:00:00", 0),
            AppointmentRecord::between(2, &grey, &bob, "2024-01-01T10:00:00", 0),
            AppointmentRecord::between(3, &grey, &alice, "2024-01-02T09:00:00", 0),
            AppointmentRecord::between(4, &shepherd, &alice, "2023-12-01T14:00:00", 1),
        ];

        Self {
            doctors: vec![grey, shepherd, bailey],
            patients: vec![alice, bob],
            appointments,
            prescriptions: Vec::new(),
        }
    }
}
