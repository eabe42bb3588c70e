//! Doctor endpoints: listing, filtering, creation, update, deletion and availability.

use chrono::NaiveDate;
use clinic_types::FilterValue;
use reqwest::Method;

use crate::client::{ActionMessages, ClinicApi};
use crate::error::ApiResult;
use crate::models::{ActionResult, AvailabilityBody, Doctor, DoctorsBody};

/// Tracing target for doctor operations.
pub const TRACING_TARGET: &str = "api_client::doctors";

const RESOURCE: &str = "doctor";

const SAVE_MESSAGES: ActionMessages = ActionMessages {
    operation: "save_doctor",
    success: "Doctor added successfully.",
    failure: "Failed to add doctor. Please try again.",
};

const UPDATE_MESSAGES: ActionMessages = ActionMessages {
    operation: "update_doctor",
    success: "Doctor updated successfully.",
    failure: "Failed to update doctor. Please try again.",
};

const DELETE_MESSAGES: ActionMessages = ActionMessages {
    operation: "delete_doctor",
    success: "Doctor deleted successfully.",
    failure: "Failed to delete doctor. Please try again.",
};

/// Doctor operations, borrowed from a [`ClinicApi`].
#[derive(Clone, Copy, Debug)]
pub struct DoctorApi<'a> {
    api: &'a ClinicApi,
}

impl<'a> DoctorApi<'a> {
    pub(crate) fn new(api: &'a ClinicApi) -> Self {
        Self { api }
    }

    /// Lists every doctor. Returns an empty list on any failure.
    pub async fn list(&self) -> Vec<Doctor> {
        match self.try_list().await {
            Ok(doctors) => doctors,
            Err(err) => {
                tracing::error!(target: TRACING_TARGET, error = %err, "Error fetching doctors");
                Vec::new()
            }
        }
    }

    /// Lists every doctor, surfacing transport and decode failures.
    ///
    /// A non-OK status is not an error: it yields an empty list.
    pub async fn try_list(&self) -> ApiResult<Vec<Doctor>> {
        let url = self.api.endpoint([RESOURCE])?;
        let body: Option<DoctorsBody> = self.api.fetch_json(url).await?;
        Ok(body.map(|b| b.doctors).unwrap_or_default())
    }

    /// Filters doctors by name, time-of-day (`AM`/`PM`) and specialty.
    ///
    /// Blank criteria place no constraint. Returns an empty list on any failure.
    pub async fn filter(&self, name: &str, time: &str, specialty: &str) -> Vec<Doctor> {
        match self.try_filter(name, time, specialty).await {
            Ok(doctors) => doctors,
            Err(err) => {
                tracing::error!(target: TRACING_TARGET, error = %err, "Error filtering doctors");
                Vec::new()
            }
        }
    }

    /// Filters doctors, surfacing transport and decode failures.
    pub async fn try_filter(
        &self,
        name: &str,
        time: &str,
        specialty: &str,
    ) -> ApiResult<Vec<Doctor>> {
        let name = FilterValue::from_input(name);
        let time = FilterValue::from_input(time);
        let specialty = FilterValue::from_input(specialty);

        let url = self.api.endpoint([
            RESOURCE,
            "filter",
            name.as_segment(),
            time.as_segment(),
            specialty.as_segment(),
        ])?;

        match self.api.fetch_json::<DoctorsBody>(url).await? {
            Some(body) => Ok(body.doctors),
            None => {
                tracing::error!(target: TRACING_TARGET, "Failed to filter doctors");
                Ok(Vec::new())
            }
        }
    }

    /// Creates a doctor. Requires an admin token.
    pub async fn create(&self, doctor: &Doctor, token: &str) -> ActionResult {
        let url = self.api.endpoint([RESOURCE, token]);
        self.api
            .send_action(Method::POST, url, Some(doctor), &SAVE_MESSAGES)
            .await
    }

    /// Updates a doctor in place. Requires an admin token.
    pub async fn update(&self, doctor: &Doctor, token: &str) -> ActionResult {
        let url = self.api.endpoint([RESOURCE, token]);
        self.api
            .send_action(Method::PUT, url, Some(doctor), &UPDATE_MESSAGES)
            .await
    }

    /// Deletes a doctor. Requires an admin token.
    pub async fn remove(&self, id: i64, token: &str) -> ActionResult {
        let id = id.to_string();
        let url = self.api.endpoint([RESOURCE, id.as_str(), token]);
        self.api
            .send_action(Method::DELETE, url, None::<&()>, &DELETE_MESSAGES)
            .await
    }

    /// Time slots still free for a doctor on `date`. Returns an empty list on any failure.
    ///
    /// `user` is the role the token was issued to (`patient` or `doctor`).
    pub async fn availability(
        &self,
        user: &str,
        doctor_id: i64,
        date: NaiveDate,
        token: &str,
    ) -> Vec<String> {
        let doctor_id = doctor_id.to_string();
        let date = date.format("%Y-%m-%d").to_string();
        let result = async {
            let url = self.api.endpoint([
                RESOURCE,
                "availability",
                user,
                doctor_id.as_str(),
                date.as_str(),
                token,
            ])?;
            self.api.fetch_json::<AvailabilityBody>(url).await
        }
        .await;

        match result {
            Ok(Some(body)) => body.into_vec(),
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    doctor_id = %doctor_id,
                    error = %err,
                    "Error fetching doctor availability"
                );
                Vec::new()
            }
        }
    }
}
