//! Structured application error

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the error shape handed to whatever transport sits in front of the
/// engine:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details for debugging
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }
}

/// Result type alias using [`AppError`]
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new_uses_default_message() {
        let err = AppError::new(ErrorCode::SlotUnavailable);
        assert_eq!(err.code, ErrorCode::SlotUnavailable);
        assert_eq!(err.message, "Requested time slot is not available");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::with_message(ErrorCode::TableOccupied, "Table 7 is occupied")
            .with_detail("table_id", 7)
            .with_detail("status", "OCCUPIED");

        let details = err.details.as_ref().unwrap();
        assert_eq!(details.get("table_id"), Some(&Value::from(7)));
        assert_eq!(details.get("status"), Some(&Value::from("OCCUPIED")));
    }

    #[test]
    fn test_convenience_constructors() {
        let err = AppError::not_found("Reservation 42");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Reservation 42 not found");
        assert!(err.details.as_ref().unwrap().contains_key("resource"));

        assert_eq!(
            AppError::validation("party size").code,
            ErrorCode::ValidationFailed
        );
        assert_eq!(
            AppError::permission_denied("staff only").code,
            ErrorCode::PermissionDenied
        );
        assert_eq!(AppError::internal("boom").code, ErrorCode::InternalError);
        assert_eq!(AppError::database("down").code, ErrorCode::DatabaseError);
    }

    #[test]
    fn test_app_error_serializes_code_as_number() {
        let err = AppError::with_message(ErrorCode::InvalidTransition, "already cancelled");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"code\":4002"));
        assert!(json.contains("\"message\":\"already cancelled\""));
        assert!(!json.contains("details"));
        assert_eq!(format!("{}", err), "already cancelled");
    }
}
