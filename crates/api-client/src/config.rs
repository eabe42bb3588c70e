//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into [`crate::ClinicApi`].
//! Nothing in this crate reads environment variables while a request is in flight.

use std::time::Duration;

use reqwest::Url;

use crate::{ApiError, ApiResult};

/// Backend address used when no explicit base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";

/// Configuration for the clinic REST client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: Url,
    timeout: Option<Duration>,
    user_agent: String,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// `base_url` may carry a path prefix (for example `http://host/api/`); resource paths are
    /// appended after it. `timeout` of `None` leaves the transport default in place.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if `base_url` does not parse or cannot carry path
    /// segments (for example `mailto:` URLs).
    pub fn new(base_url: &str, timeout: Option<Duration>) -> ApiResult<Self> {
        let parsed = Url::parse(base_url.trim())
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(format!(
                "{base_url}: URL cannot carry path segments"
            )));
        }

        Ok(Self {
            base_url: parsed,
            timeout,
            user_agent: default_user_agent(),
        })
    }

    /// Build a configuration from raw (already read) environment values.
    ///
    /// Blank values fall back to the defaults. `timeout_secs` must be a positive integer.
    pub fn from_env_values(
        base_url: Option<String>,
        timeout_secs: Option<String>,
    ) -> ApiResult<Self> {
        let base_url = base_url
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = timeout_secs
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(|v| match v.parse::<u64>() {
                Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                _ => Err(ApiError::InvalidConfig(format!(
                    "timeout must be a positive number of seconds, got '{v}'"
                ))),
            })
            .transpose()?;

        Self::new(&base_url, timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

fn default_user_agent() -> String {
    format!("clinic-portal/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_values() {
        let cfg = ClientConfig::from_env_values(None, None).expect("default config");
        assert_eq!(cfg.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout(), None);
        assert!(cfg.user_agent().starts_with("clinic-portal/"));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = ClientConfig::from_env_values(Some("  ".into()), Some("".into()))
            .expect("default config");
        assert_eq!(cfg.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout(), None);
    }

    #[test]
    fn timeout_is_parsed_in_seconds() {
        let cfg = ClientConfig::from_env_values(None, Some("15".into())).expect("config");
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ClientConfig::from_env_values(None, Some("0".into())).unwrap_err();
        assert!(matches!(err, ApiError::InvalidConfig(_)));
    }

    #[test]
    fn non_base_url_is_rejected() {
        let err = ClientConfig::new("mailto:admin@clinic.test", None).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl(_)));
    }

    #[test]
    fn unparseable_url_is_rejected() {
        let err = ClientConfig::new("not a url", None).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl(_)));
    }
}
