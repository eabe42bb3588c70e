#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read session file: {0}")]
    SessionRead(std::io::Error),
    #[error("failed to write session file: {0}")]
    SessionWrite(std::io::Error),
    #[error("failed to parse session file: {0}")]
    SessionFormat(serde_json::Error),
    #[error("backend request failed: {0}")]
    Api(#[from] api_client::ApiError),
}

impl From<clinic_types::TextError> for PortalError {
    fn from(err: clinic_types::TextError) -> Self {
        PortalError::InvalidInput(err.to_string())
    }
}

pub type PortalResult<T> = std::result::Result<T, PortalError>;
