//! Shared error type across apexporter crates.

use thiserror::Error;

/// Stable error codes, used as the `reason` label on poll error counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Missing or conflicting configuration.
    Config,
    /// Network failure or upstream error envelope.
    Upstream,
    /// Upstream answered with a non-success status.
    UpstreamStatus,
    /// Body was not valid JSON.
    Decode,
    /// A known key path was absent.
    MissingField,
    /// A key was present but held an unusable value.
    FieldType,
    /// Anything else.
    Internal,
}

impl ErrorCode {
    /// String representation used in metric labels and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Config => "config",
            ErrorCode::Upstream => "upstream",
            ErrorCode::UpstreamStatus => "upstream_status",
            ErrorCode::Decode => "decode",
            ErrorCode::MissingField => "missing_field",
            ErrorCode::FieldType => "field_type",
            ErrorCode::Internal => "internal",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("config: {0}")]
    Config(String),
    #[error("upstream request failed: {0}")]
    Upstream(String),
    #[error("upstream {endpoint} returned status {status}")]
    UpstreamStatus { endpoint: &'static str, status: u16 },
    #[error("invalid json: {0}")]
    Decode(String),
    #[error("missing field: {0}")]
    MissingField(String),
    #[error("unexpected value at {path}: expected {expected}")]
    FieldType { path: String, expected: &'static str },
    #[error("internal: {0}")]
    Internal(String),
}

impl ExporterError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ExporterError::Config(_) => ErrorCode::Config,
            ExporterError::Upstream(_) => ErrorCode::Upstream,
            ExporterError::UpstreamStatus { .. } => ErrorCode::UpstreamStatus,
            ExporterError::Decode(_) => ErrorCode::Decode,
            ExporterError::MissingField(_) => ErrorCode::MissingField,
            ExporterError::FieldType { .. } => ErrorCode::FieldType,
            ExporterError::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl From<serde_json::Error> for ExporterError {
    fn from(e: serde_json::Error) -> Self {
        ExporterError::Decode(e.to_string())
    }
}
