//! Shared HTTP plumbing for the per-resource clients.

use std::sync::Arc;

use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::appointments::AppointmentApi;
use crate::auth::AuthApi;
use crate::config::ClientConfig;
use crate::doctors::DoctorApi;
use crate::error::{ApiError, ApiResult};
use crate::models::{ActionResult, MessageBody};
use crate::patients::PatientApi;
use crate::prescriptions::PrescriptionApi;

/// Tracing target for client construction and shared request handling.
pub const TRACING_TARGET: &str = "api_client";

struct ClinicApiInner {
    http: Client,
    config: ClientConfig,
}

impl std::fmt::Debug for ClinicApiInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClinicApiInner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Client for the clinic backend REST surface.
///
/// Cheap to clone; all clones share one connection pool. Per-resource operations live on the
/// borrowed handles returned by [`doctors`](Self::doctors), [`patients`](Self::patients),
/// [`appointments`](Self::appointments), [`prescriptions`](Self::prescriptions) and
/// [`auth`](Self::auth).
#[derive(Clone, Debug)]
pub struct ClinicApi {
    inner: Arc<ClinicApiInner>,
}

/// Messages used to normalise a mutating call into an [`ActionResult`].
pub(crate) struct ActionMessages {
    pub operation: &'static str,
    /// Used when the server answered OK without a message.
    pub success: &'static str,
    /// Used when the server answered non-OK without a message, or the call failed outright.
    pub failure: &'static str,
}

impl ClinicApi {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %config.base_url(),
            timeout_ms = config.timeout().map(|t| t.as_millis() as u64),
            "Creating clinic API client"
        );

        let mut builder = Client::builder().user_agent(config.user_agent());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            inner: Arc::new(ClinicApiInner { http, config }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn doctors(&self) -> DoctorApi<'_> {
        DoctorApi::new(self)
    }

    pub fn patients(&self) -> PatientApi<'_> {
        PatientApi::new(self)
    }

    pub fn appointments(&self) -> AppointmentApi<'_> {
        AppointmentApi::new(self)
    }

    pub fn prescriptions(&self) -> PrescriptionApi<'_> {
        PrescriptionApi::new(self)
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Builds a URL by appending percent-encoded path segments to the base URL.
    pub(crate) fn endpoint<I, S>(&self, segments: I) -> ApiResult<Url>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.inner.config.base_url().clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidBaseUrl(self.inner.config.base_url().to_string()))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment.as_ref());
            }
        }
        Ok(url)
    }

    /// GETs `url` and decodes the body.
    ///
    /// Returns `Ok(None)` for a non-OK status; the body of an error response is not decoded.
    pub(crate) async fn fetch_json<B>(&self, url: Url) -> ApiResult<Option<B>>
    where
        B: DeserializeOwned,
    {
        let response = self.inner.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                target: TRACING_TARGET,
                path = url.path(),
                status = status.as_u16(),
                "Request answered with non-OK status"
            );
            return Ok(None);
        }

        let bytes = response.bytes().await?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// POSTs a JSON body and hands back the untouched response.
    pub(crate) async fn post_raw<B>(&self, url: Url, body: &B) -> ApiResult<Response>
    where
        B: Serialize + ?Sized,
    {
        Ok(self.inner.http.post(url).json(body).send().await?)
    }

    /// Sends a mutating request and normalises the outcome.
    ///
    /// Never fails: transport errors and undecodable bodies are logged and reported as
    /// `success: false` with the failure fallback message.
    pub(crate) async fn send_action<B>(
        &self,
        method: Method,
        url: ApiResult<Url>,
        body: Option<&B>,
        messages: &ActionMessages,
    ) -> ActionResult
    where
        B: Serialize + ?Sized,
    {
        let url = match url {
            Ok(url) => url,
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    operation = messages.operation,
                    error = %err,
                    "Could not build request URL"
                );
                return ActionResult::failure(messages.failure);
            }
        };

        let mut request = self.inner.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    operation = messages.operation,
                    error = %err,
                    "Request failed"
                );
                return ActionResult::failure(messages.failure);
            }
        };

        let status = response.status();
        let success = status.is_success();
        let decoded = match response.bytes().await {
            Ok(bytes) => serde_json::from_slice::<MessageBody>(&bytes).map_err(ApiError::from),
            Err(err) => Err(ApiError::from(err)),
        };

        match decoded {
            Ok(body) => {
                let fallback = if success {
                    messages.success
                } else {
                    messages.failure
                };
                let message = body.into_message().unwrap_or_else(|| fallback.to_string());
                if !success {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        operation = messages.operation,
                        status = status.as_u16(),
                        message = %message,
                        "Request rejected by server"
                    );
                }
                ActionResult { success, message }
            }
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    operation = messages.operation,
                    status = status.as_u16(),
                    error = %err,
                    "Could not read response body"
                );
                ActionResult::failure(messages.failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ClinicApi {
        ClinicApi::new(ClientConfig::new(base, None).expect("config")).expect("client")
    }

    #[test]
    fn endpoint_appends_segments_to_root() {
        let api = client("http://localhost:8080/");
        let url = api.endpoint(["doctor", "filter", "null"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/doctor/filter/null");
    }

    #[test]
    fn endpoint_keeps_path_prefix() {
        let api = client("http://localhost:8080/api/");
        let url = api.endpoint(["patient", "login"]).unwrap();
        assert_eq!(url.path(), "/api/patient/login");
    }

    #[test]
    fn endpoint_percent_encodes_segments() {
        let api = client("http://localhost:8080");
        let url = api.endpoint(["doctor", "filter", "Dr. A/B", "09:00 AM"]).unwrap();
        assert_eq!(url.path(), "/doctor/filter/Dr.%20A%2FB/09:00%20AM");
    }
}
