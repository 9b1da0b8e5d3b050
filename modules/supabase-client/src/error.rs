use serde::Deserialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SupabaseError>;

#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl SupabaseError {
    /// Build an API error from a non-success response body.
    ///
    /// PostgREST answers with `{"message", "code", "details", "hint"}`; when the
    /// body has that shape the remote `message` is surfaced, otherwise the raw
    /// body is kept as-is.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<PostgrestErrorBody>(body) {
            Ok(parsed) if parsed.message.is_some() => SupabaseError::Api {
                status,
                message: parsed.message.unwrap_or_default(),
                code: parsed.code,
            },
            _ => SupabaseError::Api {
                status,
                message: body.trim().to_string(),
                code: None,
            },
        }
    }

    /// The human-readable message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            SupabaseError::Network(m)
            | SupabaseError::Timeout(m)
            | SupabaseError::Parse(m)
            | SupabaseError::InvalidRequest(m) => m,
            SupabaseError::Api { message, .. } => message,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    message: Option<String>,
    code: Option<String>,
}

impl From<reqwest::Error> for SupabaseError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SupabaseError::Timeout(err.to_string())
        } else if err.is_decode() {
            SupabaseError::Parse(err.to_string())
        } else {
            SupabaseError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SupabaseError {
    fn from(err: serde_json::Error) -> Self {
        SupabaseError::Parse(err.to_string())
    }
}
