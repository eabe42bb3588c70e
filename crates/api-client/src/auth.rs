//! Staff login endpoints.
//!
//! Like patient login, these hand back the raw response: the token lives in the body and the
//! caller decides where to persist it.

use reqwest::Response;

use crate::client::ClinicApi;
use crate::error::ApiResult;
use crate::models::{AdminCredentials, DoctorCredentials};

/// Tracing target for authentication operations.
pub const TRACING_TARGET: &str = "api_client::auth";

#[derive(Clone, Copy, Debug)]
pub struct AuthApi<'a> {
    api: &'a ClinicApi,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(api: &'a ClinicApi) -> Self {
        Self { api }
    }

    pub async fn admin_login(&self, credentials: &AdminCredentials) -> ApiResult<Response> {
        tracing::debug!(target: TRACING_TARGET, username = %credentials.username, "Admin login");
        let url = self.api.endpoint(["admin", "login"])?;
        self.api.post_raw(url, credentials).await
    }

    pub async fn doctor_login(&self, credentials: &DoctorCredentials) -> ApiResult<Response> {
        tracing::debug!(target: TRACING_TARGET, identifier = %credentials.identifier, "Doctor login");
        let url = self.api.endpoint(["doctor", "login"])?;
        self.api.post_raw(url, credentials).await
    }
}
