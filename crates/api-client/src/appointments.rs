//! Appointment endpoints used by the doctor dashboard and the booking flow.

use chrono::NaiveDate;
use clinic_types::FilterValue;
use reqwest::Method;

use crate::client::{ActionMessages, ClinicApi};
use crate::error::ApiResult;
use crate::models::{ActionResult, Appointment, AppointmentList, AppointmentRequest};

/// Tracing target for appointment operations.
pub const TRACING_TARGET: &str = "api_client::appointments";

const RESOURCE: &str = "appointments";

const BOOK_MESSAGES: ActionMessages = ActionMessages {
    operation: "book_appointment",
    success: "Appointment booked successfully.",
    failure: "Failed to book appointment. Please try again.",
};

const UPDATE_MESSAGES: ActionMessages = ActionMessages {
    operation: "update_appointment",
    success: "Appointment updated successfully.",
    failure: "Failed to update appointment. Please try again.",
};

const CANCEL_MESSAGES: ActionMessages = ActionMessages {
    operation: "cancel_appointment",
    success: "Appointment cancelled successfully.",
    failure: "Failed to cancel appointment. Please try again.",
};

/// Appointment operations, borrowed from a [`ClinicApi`].
#[derive(Clone, Copy, Debug)]
pub struct AppointmentApi<'a> {
    api: &'a ClinicApi,
}

impl<'a> AppointmentApi<'a> {
    pub(crate) fn new(api: &'a ClinicApi) -> Self {
        Self { api }
    }

    /// Appointments on `date` for the doctor the token was issued to, optionally narrowed by
    /// patient name. Returns an empty list on any failure.
    pub async fn for_doctor(
        &self,
        date: NaiveDate,
        patient_name: &str,
        token: &str,
    ) -> Vec<Appointment> {
        match self.try_for_doctor(date, patient_name, token).await {
            Ok(list) => list,
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    date = %date,
                    error = %err,
                    "Error fetching appointments"
                );
                Vec::new()
            }
        }
    }

    /// As [`for_doctor`](Self::for_doctor), surfacing transport and decode failures.
    pub async fn try_for_doctor(
        &self,
        date: NaiveDate,
        patient_name: &str,
        token: &str,
    ) -> ApiResult<Vec<Appointment>> {
        let date = date.format("%Y-%m-%d").to_string();
        let name = FilterValue::from_input(patient_name);
        let url = self
            .api
            .endpoint([RESOURCE, date.as_str(), name.as_segment(), token])?;
        let body: Option<AppointmentList> = self.api.fetch_json(url).await?;
        Ok(body.map(AppointmentList::into_vec).unwrap_or_default())
    }

    /// Books an appointment. Requires a patient token.
    pub async fn book(&self, appointment: &AppointmentRequest, token: &str) -> ActionResult {
        let url = self.api.endpoint([RESOURCE, token]);
        self.api
            .send_action(Method::POST, url, Some(appointment), &BOOK_MESSAGES)
            .await
    }

    /// Reschedules an existing appointment. Requires a patient token.
    pub async fn update(&self, appointment: &AppointmentRequest, token: &str) -> ActionResult {
        let url = self.api.endpoint([RESOURCE, token]);
        self.api
            .send_action(Method::PUT, url, Some(appointment), &UPDATE_MESSAGES)
            .await
    }

    /// Cancels an appointment. Requires a patient token.
    pub async fn cancel(&self, id: i64, token: &str) -> ActionResult {
        let id = id.to_string();
        let url = self.api.endpoint([RESOURCE, id.as_str(), token]);
        self.api
            .send_action(Method::DELETE, url, None::<&()>, &CANCEL_MESSAGES)
            .await
    }
}
