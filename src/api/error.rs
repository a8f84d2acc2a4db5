use std::fmt;

use crate::api::api_model::ApiErrorPayload;

#[derive(Debug)]
pub enum CaseError {
    /// Request never completed (connection, timeout, TLS)
    Transport { endpoint: String, source: reqwest::Error },

    /// Non-2xx answer without a structured error body
    Http { endpoint: String, status: u16, body: String },

    /// Non-2xx answer carrying `{errors: [...]}`
    Server(ApiErrorPayload),

    /// JSON parsing failed (response body, view file, option table)
    JsonParse { context: String, source: serde_json::Error },

    /// JSON serialization failed (request body)
    JsonSerialize { context: String, source: serde_json::Error },

    /// Server answered, but not with something the container can act on
    InvalidResponse(String),

    /// Lifecycle operation not allowed in the current state
    InvalidState { operation: String, state: String },

    /// A field reached the registry without a node index
    UnindexedField { reference: String },

    /// Reading a local file failed
    Io { path: String, source: std::io::Error },
}

impl CaseError {
    /// A server rejection whose first error carries validation messages.
    pub fn is_validation(&self) -> bool {
        matches!(self, CaseError::Server(payload) if payload.is_validation())
    }

    pub fn payload(&self) -> Option<&ApiErrorPayload> {
        match self {
            CaseError::Server(payload) => Some(payload),
            _ => None,
        }
    }
}

impl fmt::Display for CaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseError::Transport { endpoint, source } => {
                write!(f, "Request to {} failed: {}", endpoint, source)
            }
            CaseError::Http { endpoint, status, body } => {
                write!(f, "{} answered {}: {}", endpoint, status, body)
            }
            CaseError::Server(payload) => match payload.errors.first() {
                Some(error) => write!(f, "Server error {}: {}", error.id, error.message),
                None => write!(f, "Server error without details"),
            },
            CaseError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            CaseError::JsonSerialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
            CaseError::InvalidResponse(msg) => {
                write!(f, "Invalid server response: {}", msg)
            }
            CaseError::InvalidState { operation, state } => {
                write!(f, "Cannot {} while {}", operation, state)
            }
            CaseError::UnindexedField { reference } => {
                write!(f, "Field '{}' has no index", reference)
            }
            CaseError::Io { path, source } => {
                write!(f, "Cannot read {}: {}", path, source)
            }
        }
    }
}

impl std::error::Error for CaseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaseError::Transport { source, .. } => Some(source),
            CaseError::JsonParse { source, .. } => Some(source),
            CaseError::JsonSerialize { source, .. } => Some(source),
            CaseError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
