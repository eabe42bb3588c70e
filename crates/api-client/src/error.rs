//! Error types for the clinic REST client.

/// Errors surfaced by the `try_` family of client calls and by client construction.
///
/// Fail-soft calls never return this type; they log it and degrade to an empty or failed value.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl ApiError {
    /// Returns true when the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
