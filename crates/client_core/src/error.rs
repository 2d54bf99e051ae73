use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeckApiError {
    #[error("invalid card api url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("card api request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("card api returned status {status} for {url}")]
    Status { status: u16, url: String },
    #[error("malformed card api response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl DeckApiError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidUrl(_) => ErrorCode::Internal,
            Self::Transport(_) => ErrorCode::Transport,
            Self::Status { status, .. } => ErrorCode::from_status(*status),
            Self::Decode(_) => ErrorCode::Decode,
        }
    }

    pub fn to_api_error(&self) -> ApiError {
        ApiError::new(self.code(), self.to_string())
    }
}
