//! Structured error types for dashboard API responses.

use crate::snapshot::SnapshotError;
use serde::Serialize;
use std::fmt;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (4xx-like)
    InvalidJson,
    UnsupportedSchemaVersion,
    InvalidFieldValue,

    // Not found errors
    SnapshotNotConfigured,
    SnapshotNotFound,

    // Internal errors
    IoError,
    InternalError,
}

impl ErrorCode {
    /// HTTP status code this error maps to.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::InvalidJson
            | ErrorCode::UnsupportedSchemaVersion
            | ErrorCode::InvalidFieldValue => 400,
            ErrorCode::SnapshotNotConfigured | ErrorCode::SnapshotNotFound => 404,
            ErrorCode::IoError | ErrorCode::InternalError => 500,
        }
    }
}

/// Structured error for API responses.
#[derive(Debug, Serialize)]
pub struct DashboardError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl DashboardError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
            details: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors

    pub fn invalid_value(field: &str, reason: &str) -> Self {
        Self::new(ErrorCode::InvalidFieldValue, reason).with_field(field)
    }

    pub fn snapshot_not_configured() -> Self {
        Self::new(
            ErrorCode::SnapshotNotConfigured,
            "No snapshot file configured; start the server with --snapshot",
        )
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, err.to_string())
    }
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DashboardError {}

impl From<SnapshotError> for DashboardError {
    fn from(err: SnapshotError) -> Self {
        match &err {
            SnapshotError::Read { path, source } => {
                let code = if source.kind() == std::io::ErrorKind::NotFound {
                    ErrorCode::SnapshotNotFound
                } else {
                    ErrorCode::IoError
                };
                Self::new(code, err.to_string()).with_details(path.display().to_string())
            }
            SnapshotError::Stdin(_) => Self::new(ErrorCode::IoError, err.to_string()),
            SnapshotError::Json(source) => {
                Self::new(ErrorCode::InvalidJson, "Invalid snapshot JSON")
                    .with_details(source.to_string())
            }
            SnapshotError::UnsupportedVersion { .. } => {
                Self::new(ErrorCode::UnsupportedSchemaVersion, err.to_string())
                    .with_field("schemaVersion")
            }
        }
    }
}

// Allow using ? with anyhow errors by converting them
impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DashboardError>() {
            Ok(dashboard_err) => dashboard_err,
            Err(err) => match err.downcast::<SnapshotError>() {
                Ok(snapshot_err) => snapshot_err.into(),
                Err(err) => DashboardError::internal(err),
            },
        }
    }
}

/// Result type for dashboard operations.
pub type DashboardResult<T> = std::result::Result<T, DashboardError>;
