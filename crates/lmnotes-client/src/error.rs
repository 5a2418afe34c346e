use lmnotes_api_types::ErrorBody;
use thiserror::Error;

/// Detail used when an error response carries no `detail` field.
pub const UNKNOWN_ERROR_DETAIL: &str = "Unknown error";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error! status: {status}, message: {detail}")]
    Status { status: u16, detail: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid server url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Build a status error from a raw response body, falling back to a
    /// generic detail when the body is not a `{detail}` object.
    pub fn from_status_body(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail_text())
            .unwrap_or_else(|| UNKNOWN_ERROR_DETAIL.to_string());

        ApiError::Status { status, detail }
    }

    /// The part of the error worth showing to a user.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Status { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
