use serde_json::Value;
use thiserror::Error;

/// Message used when a failed response carries no readable body
pub const UNKNOWN_SERVER_ERROR: &str = "Unknown server error.";

/// Closed set of ways a backend call can fail. Views branch on the variant and
/// show `user_message()` inline.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not logged in")]
    Unauthenticated,

    #[error("Request failed ({status}): {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Invalid response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    NetworkFailure(#[from] reqwest::Error),
}

/// Maximum length for error response bodies in log lines
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Build a `RequestFailed` from a non-success response body.
    ///
    /// A JSON body with a `detail` field supplies the message. `fallback` is
    /// used when the body is JSON without a usable `detail`, and
    /// `UNKNOWN_SERVER_ERROR` when the body is not JSON at all.
    pub fn from_status(status: reqwest::StatusCode, body: &str, fallback: &str) -> Self {
        Self::from_body(status, body, fallback, UNKNOWN_SERVER_ERROR)
    }

    /// Like `from_status`, but login and registration show their own
    /// `fallback` whenever the body has no usable `detail`, JSON or not.
    pub fn from_exchange_status(status: reqwest::StatusCode, body: &str, fallback: &str) -> Self {
        Self::from_body(status, body, fallback, fallback)
    }

    fn from_body(
        status: reqwest::StatusCode,
        body: &str,
        fallback: &str,
        unreadable: &str,
    ) -> Self {
        let message = match serde_json::from_str::<Value>(body) {
            Ok(json) => extract_detail(&json).unwrap_or_else(|| fallback.to_string()),
            Err(_) => unreadable.to_string(),
        };
        ApiError::RequestFailed {
            status: status.as_u16(),
            message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text suitable for showing next to the control that failed
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthenticated => "You are not logged in. Please log in again.".to_string(),
            ApiError::RequestFailed { message, .. } => message.clone(),
            ApiError::MalformedResponse(_) => {
                "The server sent a response that could not be read.".to_string()
            }
            ApiError::NetworkFailure(_) => {
                "Unable to reach the server. Check that the backend is running.".to_string()
            }
        }
    }
}

/// Pull a human-readable message out of an error body's `detail` field.
/// Validation failures carry a list of `{ "msg": ... }` entries instead of a string.
fn extract_detail(json: &Value) -> Option<String> {
    match json.get("detail")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|e| e.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}
