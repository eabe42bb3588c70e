//! Portal runtime configuration.
//!
//! Everything here is resolved once at process startup and then passed into the controllers.
//! Nothing in this crate reads environment variables while handling an interaction; callers hand
//! in the raw values so tests never need to touch the process environment.

use std::path::{Path, PathBuf};

use api_client::ClientConfig;

use crate::PortalResult;

/// Session file used when none is configured.
pub const DEFAULT_SESSION_FILE: &str = ".clinic-session.json";

/// Configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct PortalConfig {
    client: ClientConfig,
    session_file: PathBuf,
}

impl PortalConfig {
    pub fn new(client: ClientConfig, session_file: PathBuf) -> Self {
        Self {
            client,
            session_file,
        }
    }

    /// Builds a configuration from raw (typically environment-sourced) values.
    ///
    /// Missing or blank values fall back to their defaults.
    pub fn from_env_values(
        base_url: Option<String>,
        timeout_secs: Option<String>,
        session_file: Option<String>,
    ) -> PortalResult<Self> {
        let client = ClientConfig::from_env_values(base_url, timeout_secs)?;
        let session_file = session_file
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));

        Ok(Self::new(client, session_file))
    }

    pub fn client(&self) -> &ClientConfig {
        &self.client
    }

    pub fn session_file(&self) -> &Path {
        &self.session_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = PortalConfig::from_env_values(None, None, None).expect("config");
        assert_eq!(cfg.client().base_url().as_str(), api_client::DEFAULT_BASE_URL);
        assert_eq!(cfg.session_file(), Path::new(DEFAULT_SESSION_FILE));
    }

    #[test]
    fn blank_session_file_falls_back_to_default() {
        let cfg = PortalConfig::from_env_values(None, None, Some("   ".into())).expect("config");
        assert_eq!(cfg.session_file(), Path::new(DEFAULT_SESSION_FILE));
    }

    #[test]
    fn invalid_base_url_is_reported_as_api_error() {
        let err = PortalConfig::from_env_values(Some("not a url".into()), None, None).unwrap_err();
        assert!(matches!(err, crate::PortalError::Api(_)));
    }
}
