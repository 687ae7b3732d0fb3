//! Error types for record sources and fetch sessions.

use thiserror::Error;

/// Failure reported by a [`crate::RecordSource`] call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("view not found: {0}")]
    ViewNotFound(String),

    #[error("field not found: {0}")]
    FieldNotFound(String),

    /// The record disappeared between listing and value resolution.
    #[error("record not found: {0}")]
    RecordNotFound(String),

    #[error("invalid page token: {0}")]
    InvalidPageToken(String),

    /// A call that may succeed when repeated (timeouts, host hiccups).
    #[error("source call failed: {0}")]
    Transient(String),
}

impl SourceError {
    /// Returns whether the call is worth repeating.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Result type alias for source calls.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Errors raised while fetching records.
///
/// Only [`FetchError::SourceUnavailable`] is ever returned from a fetch.
/// The per-field and per-record variants describe failures the session
/// absorbs: they are logged and the fetch carries on with a null value or
/// without the record.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// Table, view, field catalog or record listing could not be reached.
    #[error("source unavailable: {0}")]
    SourceUnavailable(#[source] SourceError),

    #[error("field {field_id} of record {record_id} failed after {attempts} attempt(s): {reason}")]
    FieldResolutionFailure {
        record_id: String,
        field_id: String,
        attempts: u32,
        reason: String,
    },

    #[error("record {record_id} dropped: {reason}")]
    RecordProcessingFailure { record_id: String, reason: String },
}

impl FetchError {
    /// Returns true for errors that end a session.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_))
    }
}

impl From<SourceError> for FetchError {
    fn from(err: SourceError) -> Self {
        Self::SourceUnavailable(err)
    }
}

/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
