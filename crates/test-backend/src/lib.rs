//! # Test Backend
//!
//! An in-process stand-in for the clinic REST backend.
//!
//! [`FakeBackend::start`] binds an `axum` server to `127.0.0.1:0`, serves the same paths and JSON
//! shapes as the real backend from in-memory state, and records every request line so tests can
//! assert how many calls a controller made.
//!
//! Tokens are deterministic: [`ADMIN_TOKEN`], [`doctor_token`] and [`patient_token`] produce the
//! values the login endpoints hand out.

mod records;
mod routes;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::oneshot;

pub use records::{AppointmentRecord, DoctorRecord, PatientRecord, Seed};

/// Token issued to the admin account.
pub const ADMIN_TOKEN: &str = "admin-token";

/// Admin account accepted by `/admin/login`.
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

const DOCTOR_TOKEN_PREFIX: &str = "doctor-token-";
const PATIENT_TOKEN_PREFIX: &str = "patient-token-";

/// Token issued to the doctor with `id`.
pub fn doctor_token(id: i64) -> String {
    format!("{DOCTOR_TOKEN_PREFIX}{id}")
}

/// Token issued to the patient with `id`.
pub fn patient_token(id: i64) -> String {
    format!("{PATIENT_TOKEN_PREFIX}{id}")
}

pub(crate) fn doctor_id_from_token(token: &str) -> Option<i64> {
    token.strip_prefix(DOCTOR_TOKEN_PREFIX)?.parse().ok()
}

pub(crate) fn patient_id_from_token(token: &str) -> Option<i64> {
    token.strip_prefix(PATIENT_TOKEN_PREFIX)?.parse().ok()
}

/// Knobs tests can turn while the server is running.
#[derive(Debug, Default)]
pub(crate) struct Behaviour {
    /// When set, every mutating doctor call answers 500.
    pub reject_mutations: bool,
    /// When set, `GET /doctor` and the doctor filter answer with this status.
    pub doctor_list_status: Option<u16>,
    /// Artificial latency for the doctor appointment listing, keyed by patient-name segment.
    pub appointment_delays: HashMap<String, Duration>,
}

#[derive(Debug, Default)]
pub(crate) struct Data {
    pub doctors: Vec<DoctorRecord>,
    pub patients: Vec<PatientRecord>,
    pub appointments: Vec<AppointmentRecord>,
    pub prescriptions: Vec<serde_json::Value>,
}

impl Data {
    pub(crate) fn next_doctor_id(&self) -> i64 {
        self.doctors.iter().map(|d| d.id).max().unwrap_or(0) + 1
    }

    pub(crate) fn next_patient_id(&self) -> i64 {
        self.patients.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }

    pub(crate) fn next_appointment_id(&self) -> i64 {
        self.appointments.iter().map(|a| a.id).max().unwrap_or(0) + 1
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeState {
    data: Mutex<Data>,
    behaviour: Mutex<Behaviour>,
    requests: Mutex<Vec<String>>,
}

impl FakeState {
    pub(crate) fn data(&self) -> MutexGuard<'_, Data> {
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn behaviour(&self) -> MutexGuard<'_, Behaviour> {
        self.behaviour.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn requests(&self) -> MutexGuard<'_, Vec<String>> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A running fake backend. The server stops when this value is dropped.
pub struct FakeBackend {
    addr: SocketAddr,
    state: Arc<FakeState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl FakeBackend {
    /// Starts a server preloaded with `seed` on an ephemeral localhost port.
    pub async fn start(seed: Seed) -> std::io::Result<Self> {
        let state = Arc::new(FakeState::default());
        {
            let mut data = state.data();
            data.doctors = seed.doctors;
            data.patients = seed.patients;
            data.appointments = seed.appointments;
            data.prescriptions = seed.prescriptions;
        }

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;
        let app = routes::router(state.clone());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = served {
                tracing::error!("fake backend stopped: {e}");
            }
        });

        tracing::debug!("fake backend listening on {addr}");

        Ok(Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Base URL with a trailing slash, suitable for the client configuration.
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Every request line served so far, as `METHOD /raw/path`.
    pub fn requests(&self) -> Vec<String> {
        self.state.requests().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests().len()
    }

    /// Number of served requests whose line starts with `prefix` (e.g. `"DELETE /doctor"`).
    pub fn count_matching(&self, prefix: &str) -> usize {
        self.state
            .requests()
            .iter()
            .filter(|line| line.starts_with(prefix))
            .count()
    }

    pub fn clear_requests(&self) {
        self.state.requests().clear();
    }

    pub fn doctors(&self) -> Vec<DoctorRecord> {
        self.state.data().doctors.clone()
    }

    pub fn patients(&self) -> Vec<PatientRecord> {
        self.state.data().patients.clone()
    }

    pub fn appointments(&self) -> Vec<AppointmentRecord> {
        self.state.data().appointments.clone()
    }

    pub fn prescriptions(&self) -> Vec<serde_json::Value> {
        self.state.data().prescriptions.clone()
    }

    /// Makes every subsequent mutating doctor call fail with 500.
    pub fn reject_mutations(&self, reject: bool) {
        self.state.behaviour().reject_mutations = reject;
    }

    /// Makes the doctor list and filter endpoints answer with `status`.
    pub fn fail_doctor_listing(&self, status: u16) {
        self.state.behaviour().doctor_list_status = Some(status);
    }

    /// Delays the doctor appointment listing whenever its patient-name segment equals `name`.
    pub fn delay_appointments_for(&self, name: &str, delay: Duration) {
        self.state
            .behaviour()
            .appointment_delays
            .insert(name.to_string(), delay);
    }

    /// Stops accepting connections. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// A base URL nothing is listening on, for exercising transport failures.
pub async fn unreachable_base_url() -> std::io::Result<String> {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}/"))
}
