use std::time::Duration;

use supabase_client::SupabaseError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DataAccessError>;

/// What went wrong while reading dishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataAccessKind {
    /// The store could not be reached.
    Transport,
    /// The fetch did not resolve within the configured timeout.
    Timeout,
    /// The store answered with an error payload.
    RemoteRejected,
    /// The store answered, but not in the shape we expect.
    MalformedResponse,
    /// The request was refused locally before anything was sent.
    InvalidRequest,
}

/// The only error kind the dish query layer produces.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct DataAccessError {
    kind: DataAccessKind,
    message: String,
}

impl DataAccessError {
    pub fn new(kind: DataAccessKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(DataAccessKind::InvalidRequest, message)
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::new(DataAccessKind::RemoteRejected, message)
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(
            DataAccessKind::Timeout,
            format!("Request timed out after {}ms", after.as_millis()),
        )
    }

    pub fn kind(&self) -> DataAccessKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<SupabaseError> for DataAccessError {
    fn from(err: SupabaseError) -> Self {
        let kind = match &err {
            SupabaseError::Network(_) => DataAccessKind::Transport,
            SupabaseError::Timeout(_) => DataAccessKind::Timeout,
            SupabaseError::Api { .. } => DataAccessKind::RemoteRejected,
            SupabaseError::Parse(_) => DataAccessKind::MalformedResponse,
            SupabaseError::InvalidRequest(_) => DataAccessKind::InvalidRequest,
        };
        Self::new(kind, err.message())
    }
}
