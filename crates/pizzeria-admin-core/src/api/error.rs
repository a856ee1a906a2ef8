use serde::Deserialize;
use thiserror::Error;

/// Fallback shown when a failure carries no field message.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unauthorized - session missing or expired")]
    Unauthorized,

    #[error("Validation failed ({status}): {}", first_message(.errors))]
    Validation { status: u16, errors: Vec<FieldError> },

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error ({status}): {body}")]
    ServerError { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// One entry of the `{"errors": [...]}` body the services return on
/// rejected input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    #[serde(alias = "message")]
    pub msg: String,
    #[serde(default, alias = "param")]
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<FieldError>,
}

fn first_message(errors: &[FieldError]) -> &str {
    errors
        .first()
        .map(|e| e.msg.as_str())
        .unwrap_or(GENERIC_ERROR_MESSAGE)
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            code @ (400 | 409 | 422) => match serde_json::from_str::<ErrorBody>(body) {
                Ok(parsed) if !parsed.errors.is_empty() => ApiError::Validation {
                    status: code,
                    errors: parsed.errors,
                },
                _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
            },
            code @ 500..=599 => ApiError::ServerError {
                status: code,
                body: truncated,
            },
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// HTTP status behind this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::Unauthorized => Some(401),
            ApiError::Validation { status, .. } => Some(*status),
            ApiError::AccessDenied(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::RateLimited => Some(429),
            ApiError::ServerError { status, .. } => Some(*status),
            ApiError::InvalidResponse(_) | ApiError::InvalidRequest(_) => None,
        }
    }

    /// Message suitable for a banner or CLI output.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation { errors, .. } => first_message(errors).to_string(),
            ApiError::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            ApiError::AccessDenied(_) => "You are not allowed to do that.".to_string(),
            ApiError::Network(_) => {
                "Unable to reach the server. Check your connection.".to_string()
            }
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}
