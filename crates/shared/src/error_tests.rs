use crate::error::AppError;
use rstest::rstest;

#[rstest]
#[case(AppError::Unauthorized("x".into()), 401, "UNAUTHORIZED")]
#[case(AppError::Forbidden("x".into()), 403, "FORBIDDEN")]
#[case(AppError::NotFound("x".into()), 404, "NOT_FOUND")]
#[case(AppError::Validation("x".into()), 400, "VALIDATION_ERROR")]
#[case(AppError::BusinessRule("x".into()), 422, "BUSINESS_RULE_VIOLATION")]
#[case(AppError::Conflict("x".into()), 409, "CONFLICT")]
#[case(AppError::Storage("x".into()), 500, "STORAGE_ERROR")]
#[case(AppError::Internal("x".into()), 500, "INTERNAL_ERROR")]
fn test_status_and_code(#[case] err: AppError, #[case] status: u16, #[case] code: &str) {
    assert_eq!(err.status_code(), status);
    assert_eq!(err.error_code(), code);
}

#[test]
fn test_error_display() {
    assert_eq!(
        AppError::NotFound("leave request".into()).to_string(),
        "Not found: leave request"
    );
    assert_eq!(
        AppError::Conflict("employee E001 already exists".into()).to_string(),
        "Conflict: employee E001 already exists"
    );
    assert_eq!(
        AppError::Storage("disk full".into()).to_string(),
        "Storage error: disk full"
    );
}

#[test]
fn test_message_strips_prefix() {
    let err = AppError::Validation("end date is before start date".into());
    assert_eq!(err.message(), "end date is before start date");
}

#[test]
fn test_client_error_classification() {
    assert!(AppError::BusinessRule(String::new()).is_client_error());
    assert!(AppError::Unauthorized(String::new()).is_client_error());
    assert!(!AppError::Storage(String::new()).is_client_error());
    assert!(!AppError::Internal(String::new()).is_client_error());
}
