use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::ConfigError;

/// Client error type returned by every API call and screen action
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    // Client-side checks that block a request before it is sent
    #[error("{0}")]
    Validation(String),

    // Session errors
    #[error("Not logged in")]
    NotAuthenticated,

    // Errors reported by the backend
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{detail}")]
    Api { status: u16, detail: String },

    // Transport and local errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Build an error from a non-success response status and its raw body
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let detail = extract_detail(body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(detail),
            StatusCode::FORBIDDEN => ClientError::Forbidden(detail),
            StatusCode::NOT_FOUND => ClientError::NotFound(detail),
            _ => ClientError::Api {
                status: status.as_u16(),
                detail,
            },
        }
    }

    /// True when the backend rejected the bearer token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }

    /// Message shown to the user: the backend detail, or `fallback` for
    /// errors that carry no detail of their own.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Validation(msg)
            | ClientError::Unauthorized(msg)
            | ClientError::Forbidden(msg)
            | ClientError::NotFound(msg)
            | ClientError::Api { detail: msg, .. } => msg.clone(),
            ClientError::NotAuthenticated => self.to_string(),
            _ => fallback.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: DetailField,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DetailField {
    Message(String),
    Items(Vec<ValidationItem>),
}

#[derive(Deserialize)]
struct ValidationItem {
    msg: String,
}

/// Pull `detail` out of a FastAPI error body.
/// Validation failures arrive as a list; the first message wins.
fn extract_detail(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.detail {
        DetailField::Message(msg) => Some(msg),
        DetailField::Items(items) => items.into_iter().next().map(|item| item.msg),
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
