//! Patient endpoints: signup, login, profile lookup and appointment listing.

use clinic_types::FilterValue;
use reqwest::{Method, Response};

use crate::client::{ActionMessages, ClinicApi};
use crate::error::ApiResult;
use crate::models::{
    ActionResult, Appointment, AppointmentsBody, Patient, PatientBody, PatientCredentials,
};

/// Tracing target for patient operations.
pub const TRACING_TARGET: &str = "api_client::patients";

const RESOURCE: &str = "patient";

const SIGNUP_MESSAGES: ActionMessages = ActionMessages {
    operation: "patient_signup",
    success: "Signup successful.",
    failure: "Signup failed",
};

/// Patient operations, borrowed from a [`ClinicApi`].
#[derive(Clone, Copy, Debug)]
pub struct PatientApi<'a> {
    api: &'a ClinicApi,
}

impl<'a> PatientApi<'a> {
    pub(crate) fn new(api: &'a ClinicApi) -> Self {
        Self { api }
    }

    /// Registers a new patient.
    ///
    /// A rejected signup carries the server's message so callers can show it verbatim.
    pub async fn signup(&self, patient: &Patient) -> ActionResult {
        let url = self.api.endpoint([RESOURCE]);
        self.api
            .send_action(Method::POST, url, Some(patient), &SIGNUP_MESSAGES)
            .await
    }

    /// Authenticates a patient.
    ///
    /// The raw response is returned so the caller can read the issued token from it. Transport
    /// failures are not swallowed here.
    pub async fn login(&self, credentials: &PatientCredentials) -> ApiResult<Response> {
        tracing::debug!(target: TRACING_TARGET, email = %credentials.email, "Patient login");
        let url = self.api.endpoint([RESOURCE, "login"])?;
        self.api.post_raw(url, credentials).await
    }

    /// Fetches the patient the token was issued to.
    ///
    /// Returns `None` on a non-OK status or any failure.
    pub async fn get_by_token(&self, token: &str) -> Option<Patient> {
        let result = async {
            let url = self.api.endpoint([RESOURCE, token])?;
            self.api.fetch_json::<PatientBody>(url).await
        }
        .await;

        match result {
            Ok(body) => body.and_then(|b| b.patient),
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %err,
                    "Error fetching patient details"
                );
                None
            }
        }
    }

    /// Lists a patient's appointments. `user` is `patient` or `doctor`.
    ///
    /// Returns an empty list on any failure.
    pub async fn appointments(&self, id: i64, user: &str, token: &str) -> Vec<Appointment> {
        match self.try_appointments(id, user, token).await {
            Ok(list) => list,
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    patient_id = id,
                    error = %err,
                    "Error fetching patient appointments"
                );
                Vec::new()
            }
        }
    }

    pub async fn try_appointments(
        &self,
        id: i64,
        user: &str,
        token: &str,
    ) -> ApiResult<Vec<Appointment>> {
        let id = id.to_string();
        let url = self.api.endpoint([RESOURCE, id.as_str(), user, token])?;
        let body: Option<AppointmentsBody> = self.api.fetch_json(url).await?;
        Ok(body.map(|b| b.appointments).unwrap_or_default())
    }

    /// Filters the token holder's appointments by condition (`past`/`future`) and doctor name.
    ///
    /// Blank criteria place no constraint. Returns an empty list on any failure.
    pub async fn filter_appointments(
        &self,
        condition: &str,
        name: &str,
        token: &str,
    ) -> Vec<Appointment> {
        match self.try_filter_appointments(condition, name, token).await {
            Ok(list) => list,
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %err,
                    "Error filtering appointments"
                );
                Vec::new()
            }
        }
    }

    pub async fn try_filter_appointments(
        &self,
        condition: &str,
        name: &str,
        token: &str,
    ) -> ApiResult<Vec<Appointment>> {
        let condition = FilterValue::from_input(condition);
        let name = FilterValue::from_input(name);
        let url = self.api.endpoint([
            RESOURCE,
            "filter",
            condition.as_segment(),
            name.as_segment(),
            token,
        ])?;

        match self.api.fetch_json::<AppointmentsBody>(url).await? {
            Some(body) => Ok(body.appointments),
            None => {
                tracing::error!(target: TRACING_TARGET, "Failed to filter appointments");
                Ok(Vec::new())
            }
        }
    }
}
