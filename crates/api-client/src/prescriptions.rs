//! Prescription endpoints, available to doctors only.

use reqwest::Method;

use crate::client::{ActionMessages, ClinicApi};
use crate::models::{ActionResult, Prescription, PrescriptionBody};

/// Tracing target for prescription operations.
pub const TRACING_TARGET: &str = "api_client::prescriptions";

const RESOURCE: &str = "prescription";

const SAVE_MESSAGES: ActionMessages = ActionMessages {
    operation: "save_prescription",
    success: "Prescription saved successfully.",
    failure: "Failed to save prescription. Please try again.",
};

#[derive(Clone, Copy, Debug)]
pub struct PrescriptionApi<'a> {
    api: &'a ClinicApi,
}

impl<'a> PrescriptionApi<'a> {
    pub(crate) fn new(api: &'a ClinicApi) -> Self {
        Self { api }
    }

    pub async fn save(&self, prescription: &Prescription, token: &str) -> ActionResult {
        let url = self.api.endpoint([RESOURCE, token]);
        self.api
            .send_action(Method::POST, url, Some(prescription), &SAVE_MESSAGES)
            .await
    }

    /// Prescription written for an appointment, if any. `None` on any failure.
    pub async fn get(&self, appointment_id: i64, token: &str) -> Option<Prescription> {
        let appointment_id = appointment_id.to_string();
        let result = async {
            let url = self
                .api
                .endpoint([RESOURCE, appointment_id.as_str(), token])?;
            self.api.fetch_json::<PrescriptionBody>(url).await
        }
        .await;

        match result {
            Ok(body) => body.map(PrescriptionBody::into_inner),
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    appointment_id = %appointment_id,
                    error = %err,
                    "Error fetching prescription"
                );
                None
            }
        }
    }
}
