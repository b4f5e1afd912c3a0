//! Unit tests for JWT functionality.

use chrono::{Duration, Utc};

use crate::auth::Claims;
use crate::jwt::{JwtConfig, JwtError, JwtService};
use crate::types::EmployeeId;

fn create_test_service() -> JwtService {
    JwtService::new(JwtConfig {
        secret: "test-secret-key-for-testing".to_string(),
        access_token_expires_secs: 900,
    })
}

fn employee(code: &str) -> EmployeeId {
    EmployeeId::parse(code).unwrap()
}

#[test]
fn test_claims_new_sets_correct_fields() {
    let expires_at = Utc::now() + Duration::hours(1);

    let claims = Claims::new(employee("HR001"), "hr", expires_at);

    assert_eq!(claims.employee_id().as_str(), "HR001");
    assert_eq!(claims.role, "hr");
    assert!(claims.iat <= Utc::now().timestamp());
    assert_eq!(claims.exp, expires_at.timestamp());
}

#[test]
fn test_generate_and_validate_token() {
    let service = create_test_service();

    let token = service
        .generate_access_token(&employee("SITE001"), "site_incharge")
        .unwrap();
    let claims = service.validate_token(&token).unwrap();

    assert_eq!(claims.sub, employee("SITE001"));
    assert_eq!(claims.role, "site_incharge");
    assert_eq!(service.access_token_expires_in(), 900);
}

#[test]
fn test_invalid_token() {
    let service = create_test_service();
    let result = service.validate_token("invalid.token.here");
    assert!(matches!(result, Err(JwtError::DecodingError(_))));
}

#[test]
fn test_token_signed_with_other_secret_is_rejected() {
    let other = JwtService::new(JwtConfig {
        secret: "another-secret".to_string(),
        access_token_expires_secs: 900,
    });
    let token = other
        .generate_access_token(&employee("E001"), "employee")
        .unwrap();

    assert!(create_test_service().validate_token(&token).is_err());
}

#[test]
fn test_expired_token() {
    let service = JwtService::new(JwtConfig {
        secret: "test-secret-key-for-testing".to_string(),
        // Well past the default 60s leeway.
        access_token_expires_secs: -3600,
    });
    let token = service
        .generate_access_token(&employee("E001"), "employee")
        .unwrap();

    assert!(matches!(service.validate_token(&token), Err(JwtError::Expired)));
}
