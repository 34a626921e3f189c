use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Client-level error type.
/// Every API call returns `Result<T, ClientError>`; views decide what to show.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Session expired or invalid, please log in again")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("No session token stored; log in first")]
    MissingToken,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ClientError {
    /// True for the failures the gateway treats as the end of the session.
    pub fn ends_session(&self) -> bool {
        matches!(self, ClientError::Unauthorized | ClientError::Forbidden)
    }

    /// Builds an error from a non-success response body.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden,
            _ => ClientError::Api {
                status: status.as_u16(),
                message: extract_message(body),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Flat { message: String },
    Nested { error: NestedError },
}

#[derive(Debug, Deserialize)]
struct NestedError {
    message: String,
}

/// Pulls a human message out of `{"message": ..}` or `{"error": {"message": ..}}`.
fn extract_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody::Flat { message }) => message,
        Ok(ErrorBody::Nested { error }) => error.message,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
