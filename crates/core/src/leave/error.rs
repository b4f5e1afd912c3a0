//! Error type for every leave operation.

use thiserror::Error;

use leaveflow_shared::AppError;
use leaveflow_shared::types::{CancellationId, EmployeeId, LeaveRequestId};

use crate::auth::PasswordError;
use crate::leave::types::LeaveStatus;
use crate::repository::RepositoryError;

/// Errors that can occur in leave, cancellation, ledger, and directory operations.
#[derive(Debug, Error)]
pub enum LeaveError {
    /// Malformed input.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unknown leave request.
    #[error("Leave request {0} not found")]
    RequestNotFound(LeaveRequestId),

    /// Unknown cancellation request.
    #[error("Cancellation request {0} not found")]
    CancellationNotFound(CancellationId),

    /// Unknown employee (no directory entry or no ledger row).
    #[error("Employee {0} not found")]
    EmployeeNotFound(EmployeeId),

    /// The request's status does not allow the action.
    #[error("Cannot {action} while request is {status}")]
    InvalidStage {
        /// Status at the time of the attempt.
        status: LeaveStatus,
        /// What was attempted.
        action: &'static str,
    },

    /// Employee id already registered.
    #[error("Employee {0} already exists")]
    Duplicate(EmployeeId),

    /// The leave request already has an open cancellation.
    #[error("Leave request {0} already has a cancellation in progress")]
    CancellationInProgress(LeaveRequestId),

    /// Bad credentials: password or security answer.
    #[error("Invalid employee id or credentials")]
    Unauthorized,

    /// Password rules or hashing failure.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Storage failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl LeaveError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Password(PasswordError::TooShort) => 400,
            Self::Unauthorized => 401,
            Self::RequestNotFound(_) | Self::CancellationNotFound(_) | Self::EmployeeNotFound(_) => {
                404
            }
            Self::Duplicate(_) | Self::CancellationInProgress(_) => 409,
            Self::InvalidStage { .. } => 422,
            Self::Password(_) | Self::Repository(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::Password(PasswordError::TooShort) => "VALIDATION_ERROR",
            Self::RequestNotFound(_) => "REQUEST_NOT_FOUND",
            Self::CancellationNotFound(_) => "CANCELLATION_NOT_FOUND",
            Self::EmployeeNotFound(_) => "EMPLOYEE_NOT_FOUND",
            Self::InvalidStage { .. } => "INVALID_STAGE",
            Self::Duplicate(_) => "DUPLICATE_EMPLOYEE",
            Self::CancellationInProgress(_) => "CANCELLATION_IN_PROGRESS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Password(_) => "PASSWORD_ERROR",
            Self::Repository(_) => "STORAGE_ERROR",
        }
    }
}

impl From<LeaveError> for AppError {
    fn from(err: LeaveError) -> Self {
        let message = err.to_string();
        match err {
            LeaveError::Validation(_) | LeaveError::Password(PasswordError::TooShort) => {
                Self::Validation(message)
            }
            LeaveError::RequestNotFound(_)
            | LeaveError::CancellationNotFound(_)
            | LeaveError::EmployeeNotFound(_) => Self::NotFound(message),
            LeaveError::Duplicate(_) | LeaveError::CancellationInProgress(_) => {
                Self::Conflict(message)
            }
            LeaveError::InvalidStage { .. } => Self::BusinessRule(message),
            LeaveError::Unauthorized => Self::Unauthorized(message),
            LeaveError::Repository(_) => Self::Storage(message),
            LeaveError::Password(_) => Self::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_stage_error() {
        let err = LeaveError::InvalidStage {
            status: LeaveStatus::Rejected,
            action: "record a decision",
        };
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "INVALID_STAGE");
        assert!(err.to_string().contains("rejected"));
    }

    #[test]
    fn test_not_found_errors() {
        let err = LeaveError::RequestNotFound(LeaveRequestId::new());
        assert_eq!(err.status_code(), 404);
        assert!(matches!(AppError::from(err), AppError::NotFound(_)));

        let err = LeaveError::EmployeeNotFound(EmployeeId::parse("E404").unwrap());
        assert_eq!(err.error_code(), "EMPLOYEE_NOT_FOUND");
        assert!(err.to_string().contains("E404"));
    }

    #[test]
    fn test_conflict_errors() {
        let err = LeaveError::Duplicate(EmployeeId::parse("E001").unwrap());
        assert_eq!(err.status_code(), 409);
        assert!(matches!(AppError::from(err), AppError::Conflict(_)));

        let err = LeaveError::CancellationInProgress(LeaveRequestId::new());
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "CANCELLATION_IN_PROGRESS");
    }

    #[test]
    fn test_short_password_is_validation() {
        let err = LeaveError::from(PasswordError::TooShort);
        assert_eq!(err.status_code(), 400);
        assert!(matches!(AppError::from(err), AppError::Validation(_)));
    }

    #[test]
    fn test_repository_error_is_storage() {
        let err = LeaveError::from(RepositoryError::Unavailable("disk full".to_string()));
        assert_eq!(err.status_code(), 500);
        assert!(matches!(AppError::from(err), AppError::Storage(_)));
    }

    #[test]
    fn test_unauthorized_message_is_generic() {
        let err = LeaveError::Unauthorized;
        assert_eq!(err.to_string(), "Invalid employee id or credentials");
        assert!(matches!(AppError::from(err), AppError::Unauthorized(_)));
    }
}
