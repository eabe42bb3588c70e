//! # API Client
//!
//! Async REST client for the clinic backend.
//!
//! Handles:
//! - URL construction from a configurable base path (path segments are percent-encoded)
//! - JSON request bodies and response decoding
//! - Normalising responses into collections, optional records or [`ActionResult`]
//!
//! Every call except the login calls is fail-soft: it never returns an error to the caller.
//! Failures are logged once with `tracing` and degrade to an empty list, `None`, or an
//! `ActionResult` with `success: false`. Controllers that need to tell transport failures apart
//! use the `try_` variants, which return [`ApiResult`].
//!
//! ```rust,ignore
//! use api_client::{ClientConfig, ClinicApi};
//!
//! let api = ClinicApi::new(ClientConfig::new("http://localhost:8080/", None)?)?;
//! let doctors = api.doctors().filter("", "AM", "Cardiology").await;
//! ```

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod appointments;
pub mod auth;
pub mod client;
pub mod config;
pub mod doctors;
pub mod error;
pub mod models;
pub mod patients;
pub mod prescriptions;

pub use appointments::AppointmentApi;
pub use auth::AuthApi;
pub use client::ClinicApi;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use doctors::DoctorApi;
pub use error::{ApiError, ApiResult};
pub use models::{
    ActionResult, AdminCredentials, Appointment, AppointmentRequest, Doctor, DoctorCredentials,
    Patient, PatientCredentials, PatientSummary, Prescription, RecordRef, TokenBody,
    STATUS_COMPLETED, STATUS_SCHEDULED,
};
pub use patients::PatientApi;
pub use prescriptions::PrescriptionApi;
pub use reqwest::{Response, StatusCode};
