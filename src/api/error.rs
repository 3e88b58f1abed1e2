use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::api::types::ApiErrorBody;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Build a status error from a non-2xx response body. The JSON `message`
    /// wins, then the raw body, then the canonical reason.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
        if let Some(reported) = parsed.as_ref().and_then(|b| b.status.as_ref()) {
            debug!(http = status.as_u16(), %reported, "error body status");
        }
        let message = parsed
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });
        ApiError::Status { status, message }
    }

    /// Text shown inline in the UI for this failure.
    pub fn display_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
