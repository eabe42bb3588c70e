//! Route table and handlers of the fake backend.
//!
//! Parameter names are positional (`:a`, `:b`, ...) because the router requires every parameter
//! at the same depth under a shared prefix to carry the same name.

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::records::{AppointmentRecord, DoctorRecord, PatientRecord};
use crate::{
    doctor_id_from_token, patient_id_from_token, FakeState, ADMIN_PASSWORD, ADMIN_TOKEN,
    ADMIN_USERNAME,
};

type Shared = State<Arc<FakeState>>;
type Reply = (StatusCode, Json<Value>);

pub(crate) fn router(state: Arc<FakeState>) -> Router {
    Router::new()
        .route("/admin/login", post(admin_login))
        .route("/doctor", get(list_doctors))
        .route("/doctor/login", post(doctor_login))
        .route("/doctor/filter/:a/:b/:c", get(filter_doctors))
        .route("/doctor/availability/:a/:b/:c/:d", get(doctor_availability))
        .route("/doctor/:a", post(save_doctor).put(update_doctor))
        .route("/doctor/:a/:b", delete(delete_doctor))
        .route("/patient", post(signup))
        .route("/patient/login", post(patient_login))
        .route("/patient/filter/:a/:b/:c", get(filter_patient_appointments))
        .route("/patient/:a", get(get_patient))
        .route("/patient/:a/:b/:c", get(patient_appointments))
        .route("/appointments/:a", post(book_appointment).put(update_appointment))
        .route("/appointments/:a/:b", delete(cancel_appointment))
        .route("/appointments/:a/:b/:c", get(doctor_appointments))
        .route("/prescription/:a", post(save_prescription))
        .route("/prescription/:a/:b", get(get_prescription))
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn record_request(State(state): Shared, request: Request, next: Next) -> Response {
    state
        .requests()
        .push(format!("{} {}", request.method(), request.uri().path()));
    next.run(request).await
}

fn message(status: StatusCode, text: impl Into<String>) -> Reply {
    (status, Json(json!({ "message": text.into() })))
}

fn error(status: StatusCode, text: impl Into<String>) -> Reply {
    (status, Json(json!({ "error": text.into() })))
}

fn is_any(segment: &str) -> bool {
    segment.is_empty() || segment == "null"
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct LoginBody {
    #[serde(default, alias = "username", alias = "email")]
    identifier: String,
    #[serde(default)]
    password: String,
}

async fn admin_login(Json(body): Json<LoginBody>) -> Reply {
    if body.identifier == ADMIN_USERNAME && body.password == ADMIN_PASSWORD {
        (StatusCode::OK, Json(json!({ "token": ADMIN_TOKEN })))
    } else {
        error(StatusCode::UNAUTHORIZED, "Invalid credentials")
    }
}

async fn doctor_login(State(state): Shared, Json(body): Json<LoginBody>) -> Reply {
    let data = state.data();
    match data.doctors.iter().find(|d| {
        d.email == body.identifier && d.password.as_deref() == Some(body.password.as_str())
    }) {
        Some(doctor) => (
            StatusCode::OK,
            Json(json!({ "token": crate::doctor_token(doctor.id) })),
        ),
        None => error(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    }
}

async fn patient_login(State(state): Shared, Json(body): Json<LoginBody>) -> Reply {
    let data = state.data();
    match data.patients.iter().find(|p| {
        p.email == body.identifier && p.password.as_deref() == Some(body.password.as_str())
    }) {
        Some(patient) => (
            StatusCode::OK,
            Json(json!({ "token": crate::patient_token(patient.id) })),
        ),
        None => error(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    }
}

// ---------------------------------------------------------------------------
// Doctors
// ---------------------------------------------------------------------------

fn listing_failure(state: &FakeState) -> Option<Reply> {
    let status = state.behaviour().doctor_list_status?;
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Some(error(status, "Unable to fetch doctors"))
}

async fn list_doctors(State(state): Shared) -> Reply {
    if let Some(reply) = listing_failure(&state) {
        return reply;
    }
    let doctors = state.data().doctors.clone();
    (StatusCode::OK, Json(json!({ "doctors": doctors })))
}

async fn filter_doctors(
    State(state): Shared,
    Path((name, time, specialty)): Path<(String, String, String)>,
) -> Reply {
    if let Some(reply) = listing_failure(&state) {
        return reply;
    }

    let doctors: Vec<DoctorRecord> = state
        .data()
        .doctors
        .iter()
        .filter(|d| is_any(&name) || contains_ignore_case(&d.name, &name))
        .filter(|d| {
            is_any(&time)
                || d.available_times
                    .iter()
                    .any(|slot| slot.to_uppercase().ends_with(&time.to_uppercase()))
        })
        .filter(|d| is_any(&specialty) || d.specialty.eq_ignore_ascii_case(&specialty))
        .cloned()
        .collect();

    (StatusCode::OK, Json(json!({ "doctors": doctors })))
}

async fn save_doctor(
    State(state): Shared,
    Path(token): Path<String>,
    Json(mut doctor): Json<DoctorRecord>,
) -> Reply {
    if token != ADMIN_TOKEN {
        return error(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    if state.behaviour().reject_mutations {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Some internal error occurred");
    }

    let mut data = state.data();
    if data.doctors.iter().any(|d| d.email == doctor.email) {
        return error(StatusCode::CONFLICT, "Doctor already exists");
    }
    doctor.id = data.next_doctor_id();
    data.doctors.push(doctor);
    message(StatusCode::CREATED, "Doctor added to db")
}

async fn update_doctor(
    State(state): Shared,
    Path(token): Path<String>,
    Json(doctor): Json<DoctorRecord>,
) -> Reply {
    if token != ADMIN_TOKEN {
        return error(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    if state.behaviour().reject_mutations {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Some internal error occurred");
    }

    let mut data = state.data();
    match data.doctors.iter_mut().find(|d| d.id == doctor.id) {
        Some(existing) => {
            let password = doctor.password.clone().or_else(|| existing.password.clone());
            *existing = DoctorRecord {
                password,
                ..doctor
            };
            message(StatusCode::OK, "Doctor updated")
        }
        None => error(StatusCode::NOT_FOUND, "Doctor not found"),
    }
}

async fn delete_doctor(
    State(state): Shared,
    Path((id, token)): Path<(String, String)>,
) -> Reply {
    let Ok(id) = id.parse::<i64>() else {
        return error(StatusCode::BAD_REQUEST, "Invalid doctor id");
    };
    if token != ADMIN_TOKEN {
        return error(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    if state.behaviour().reject_mutations {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Some internal error occurred");
    }

    let mut data = state.data();
    let before = data.doctors.len();
    data.doctors.retain(|d| d.id != id);
    if data.doctors.len() < before {
        message(StatusCode::OK, "Doctor deleted successfully")
    } else {
        error(
            StatusCode::NOT_FOUND,
            format!("Doctor not found with id {id}"),
        )
    }
}

async fn doctor_availability(
    State(state): Shared,
    Path((user, doctor_id, _date, token)): Path<(String, String, String, String)>,
) -> Reply {
    let authorised = match user.as_str() {
        "patient" => patient_id_from_token(&token).is_some(),
        "doctor" => doctor_id_from_token(&token).is_some(),
        _ => false,
    };
    if !authorised {
        return error(StatusCode::UNAUTHORIZED, "Invalid token");
    }

    let data = state.data();
    match doctor_id
        .parse::<i64>()
        .ok()
        .and_then(|id| data.doctors.iter().find(|d| d.id == id))
    {
        Some(doctor) => (
            StatusCode::OK,
            Json(json!({ "availableTimes": doctor.available_times })),
        ),
        None => error(StatusCode::INTERNAL_SERVER_ERROR, "Unable to fetch availability"),
    }
}

// ---------------------------------------------------------------------------
// Patients
// ---------------------------------------------------------------------------

async fn signup(State(state): Shared, Json(mut patient): Json<PatientRecord>) -> Reply {
    let mut data = state.data();
    if data
        .patients
        .iter()
        .any(|p| p.email == patient.email || p.phone == patient.phone)
    {
        return message(
            StatusCode::CONFLICT,
            "Patient with email id or phone no already exist",
        );
    }
    patient.id = data.next_patient_id();
    data.patients.push(patient);
    message(StatusCode::CREATED, "Signup successful")
}

async fn get_patient(State(state): Shared, Path(token): Path<String>) -> Reply {
    let data = state.data();
    match patient_id_from_token(&token).and_then(|id| data.patients.iter().find(|p| p.id == id)) {
        Some(patient) => (StatusCode::OK, Json(json!({ "patient": patient }))),
        None => error(StatusCode::UNAUTHORIZED, "Invalid or expired token"),
    }
}

async fn patient_appointments(
    State(state): Shared,
    Path((id, _user, token)): Path<(String, String, String)>,
) -> Reply {
    let id = id.parse::<i64>().ok();
    if id.is_none() || patient_id_from_token(&token) != id {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized access");
    }

    let appointments: Vec<AppointmentRecord> = state
        .data()
        .appointments
        .iter()
        .filter(|a| Some(a.patient_id) == id)
        .cloned()
        .collect();
    (StatusCode::OK, Json(json!({ "appointments": appointments })))
}

async fn filter_patient_appointments(
    State(state): Shared,
    Path((condition, name, token)): Path<(String, String, String)>,
) -> Reply {
    let Some(patient_id) = patient_id_from_token(&token) else {
        return error(StatusCode::UNAUTHORIZED, "Invalid or expired token");
    };

    let status = if is_any(&condition) {
        None
    } else if condition.eq_ignore_ascii_case("past") {
        Some(1)
    } else if condition.eq_ignore_ascii_case("future") {
        Some(0)
    } else {
        return error(StatusCode::BAD_REQUEST, "Invalid condition");
    };

    let appointments: Vec<AppointmentRecord> = state
        .data()
        .appointments
        .iter()
        .filter(|a| a.patient_id == patient_id)
        .filter(|a| status.map_or(true, |s| a.status == s))
        .filter(|a| is_any(&name) || contains_ignore_case(&a.doctor_name, &name))
        .cloned()
        .collect();
    (StatusCode::OK, Json(json!({ "appointments": appointments })))
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

async fn doctor_appointments(
    State(state): Shared,
    Path((date, name, token)): Path<(String, String, String)>,
) -> Response {
    let delay = state.behaviour().appointment_delays.get(&name).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let Some(doctor_id) = doctor_id_from_token(&token) else {
        return error(StatusCode::UNAUTHORIZED, "Invalid or unauthorized token").into_response();
    };

    let appointments: Vec<AppointmentRecord> = state
        .data()
        .appointments
        .iter()
        .filter(|a| a.doctor_id == doctor_id && a.date() == date)
        .filter(|a| is_any(&name) || contains_ignore_case(&a.patient_name, &name))
        .cloned()
        .collect();
    (StatusCode::OK, Json(appointments)).into_response()
}

#[derive(Deserialize)]
struct IdRef {
    id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppointmentBody {
    #[serde(default)]
    id: Option<i64>,
    doctor: IdRef,
    patient: IdRef,
    appointment_time: String,
    #[serde(default)]
    status: i32,
}

async fn book_appointment(
    State(state): Shared,
    Path(token): Path<String>,
    Json(body): Json<AppointmentBody>,
) -> Reply {
    if patient_id_from_token(&token).is_none() {
        return error(StatusCode::UNAUTHORIZED, "Invalid or unauthorized token");
    }

    let mut data = state.data();
    let doctor = data.doctors.iter().find(|d| d.id == body.doctor.id).cloned();
    let patient = data.patients.iter().find(|p| p.id == body.patient.id).cloned();
    let (Some(doctor), Some(patient)) = (doctor, patient) else {
        return error(StatusCode::BAD_REQUEST, "Invalid appointment details");
    };
    if data
        .appointments
        .iter()
        .any(|a| a.doctor_id == doctor.id && a.appointment_time == body.appointment_time)
    {
        return error(StatusCode::BAD_REQUEST, "Invalid appointment details");
    }

    let id = data.next_appointment_id();
    data.appointments.push(AppointmentRecord::between(
        id,
        &doctor,
        &patient,
        &body.appointment_time,
        body.status,
    ));
    message(StatusCode::CREATED, "Appointment booked successfully")
}

async fn update_appointment(
    State(state): Shared,
    Path(token): Path<String>,
    Json(body): Json<AppointmentBody>,
) -> Reply {
    if patient_id_from_token(&token).is_none() {
        return error(StatusCode::UNAUTHORIZED, "Invalid or unauthorized token");
    }

    let mut data = state.data();
    match body
        .id
        .and_then(|id| data.appointments.iter_mut().find(|a| a.id == id))
    {
        Some(existing) => {
            existing.appointment_time = body.appointment_time;
            existing.status = body.status;
            message(StatusCode::OK, "Appointment updated successfully")
        }
        None => error(StatusCode::INTERNAL_SERVER_ERROR, "Unable to update appointment"),
    }
}

async fn cancel_appointment(
    State(state): Shared,
    Path((id, token)): Path<(String, String)>,
) -> Reply {
    if patient_id_from_token(&token).is_none() {
        return error(StatusCode::UNAUTHORIZED, "Invalid or unauthorized token");
    }

    let mut data = state.data();
    let before = data.appointments.len();
    if let Ok(id) = id.parse::<i64>() {
        data.appointments.retain(|a| a.id != id);
    }
    if data.appointments.len() < before {
        message(StatusCode::OK, "Appointment canceled successfully")
    } else {
        error(StatusCode::INTERNAL_SERVER_ERROR, "Unable to cancel appointment")
    }
}

// ---------------------------------------------------------------------------
// Prescriptions
// ---------------------------------------------------------------------------

async fn save_prescription(
    State(state): Shared,
    Path(token): Path<String>,
    Json(prescription): Json<Value>,
) -> Reply {
    if doctor_id_from_token(&token).is_none() {
        return error(StatusCode::UNAUTHORIZED, "Invalid or expired token");
    }

    let mut data = state.data();
    if let Some(appointment_id) = prescription.get("appointmentId").and_then(Value::as_i64) {
        if let Some(appointment) = data.appointments.iter_mut().find(|a| a.id == appointment_id)
        {
            appointment.status = 1;
        }
    }
    data.prescriptions.push(prescription);
    message(StatusCode::CREATED, "Prescription saved successfully")
}

async fn get_prescription(
    State(state): Shared,
    Path((appointment_id, token)): Path<(String, String)>,
) -> Reply {
    if doctor_id_from_token(&token).is_none() {
        return error(StatusCode::UNAUTHORIZED, "Invalid or expired token");
    }

    let appointment_id = appointment_id.parse::<i64>().ok();
    let data = state.data();
    match data
        .prescriptions
        .iter()
        .find(|p| p.get("appointmentId").and_then(Value::as_i64) == appointment_id)
    {
        Some(prescription) => (StatusCode::OK, Json(prescription.clone())),
        None => message(
            StatusCode::NOT_FOUND,
            "No prescription found for this appointment",
        ),
    }
}
