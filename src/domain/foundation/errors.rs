//! Error types for the domain layer.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    EmptyField,
    OutOfRange,
    InvalidFormat,

    // Not found errors
    EntryNotFound,
    ScopeEmpty,
    ModuleNotFound,
    SubmoduleNotFound,

    // State errors
    InvalidStateTransition,
    NotAUserResponse,
    AlreadyDiscarded,
    ChainWriteConflict,

    // Pipeline errors
    GenerationTimeout,
    GenerationAuthFailure,
    GenerationMalformedResponse,
    RepromptFailed,

    // Infrastructure errors
    StoreError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::EntryNotFound => "ENTRY_NOT_FOUND",
            ErrorCode::ScopeEmpty => "SCOPE_EMPTY",
            ErrorCode::ModuleNotFound => "MODULE_NOT_FOUND",
            ErrorCode::SubmoduleNotFound => "SUBMODULE_NOT_FOUND",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::NotAUserResponse => "NOT_A_USER_RESPONSE",
            ErrorCode::AlreadyDiscarded => "ALREADY_DISCARDED",
            ErrorCode::ChainWriteConflict => "CHAIN_WRITE_CONFLICT",
            ErrorCode::GenerationTimeout => "GENERATION_TIMEOUT",
            ErrorCode::GenerationAuthFailure => "GENERATION_AUTH_FAILURE",
            ErrorCode::GenerationMalformedResponse => "GENERATION_MALFORMED_RESPONSE",
            ErrorCode::RepromptFailed => "REPROMPT_FAILED",
            ErrorCode::StoreError => "STORE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            details: HashMap::new(),
        }
        .with_detail("field", field.into())
    }

    /// Creates a store error wrapping an infrastructure failure.
    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreError, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let code = match err {
            ValidationError::EmptyField { .. } => ErrorCode::EmptyField,
            ValidationError::OutOfRange { .. } => ErrorCode::OutOfRange,
            ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
        };
        DomainError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("content");
        assert_eq!(format!("{}", err), "Field 'content' cannot be empty");
    }

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("position", 0, 100, 150);
        assert_eq!(
            format!("{}", err),
            "Field 'position' must be between 0 and 100, got 150"
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::EntryNotFound, "Entry not found");
        assert_eq!(format!("{}", err), "[ENTRY_NOT_FOUND] Entry not found");
    }

    #[test]
    fn domain_error_with_detail_adds_detail() {
        let err = DomainError::new(ErrorCode::ValidationFailed, "Validation failed")
            .with_detail("field", "content")
            .with_detail("reason", "empty");

        assert_eq!(err.details.get("field"), Some(&"content".to_string()));
        assert_eq!(err.details.get("reason"), Some(&"empty".to_string()));
    }

    #[test]
    fn validation_error_converts_to_domain_error() {
        let err: DomainError = ValidationError::empty_field("content").into();
        assert_eq!(err.code, ErrorCode::EmptyField);
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::RepromptFailed), "REPROMPT_FAILED");
        assert_eq!(
            format!("{}", ErrorCode::ChainWriteConflict),
            "CHAIN_WRITE_CONFLICT"
        );
    }
}
