//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;
use leaveflow_core::auth::StaffRole;
use leaveflow_core::leave::ApproverRole;
use leaveflow_shared::Claims;
use leaveflow_shared::types::EmployeeId;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "MISSING_TOKEN",
                "message": "Authorization header with Bearer token is required"
            })),
        )
            .into_response();
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            let (error, message) = match e {
                leaveflow_shared::JwtError::Expired => ("TOKEN_EXPIRED", "Token has expired"),
                _ => ("INVALID_TOKEN", "Invalid or malformed token"),
            };

            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": error, "message": message })),
            )
                .into_response()
        }
    }
}

/// Extractor for the authenticated staff member's claims.
///
/// ```ignore
/// async fn handler(user: AuthUser) -> impl IntoResponse {
///     let employee_id = user.employee_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the employee code from the claims.
    #[must_use]
    pub fn employee_id(&self) -> &EmployeeId {
        self.0.employee_id()
    }

    /// Returns the staff role. Unknown roles read as `Employee`.
    #[must_use]
    pub fn role(&self) -> StaffRole {
        StaffRole::parse(&self.0.role).unwrap_or(StaffRole::Employee)
    }

    /// True if the caller is `employee_id` or may read everyone's records.
    #[must_use]
    pub fn can_view(&self, employee_id: &EmployeeId) -> bool {
        self.employee_id() == employee_id || self.role().can_view_all()
    }

    /// True if the caller may act for `stage`.
    #[must_use]
    pub fn can_decide_as(&self, stage: ApproverRole) -> bool {
        self.role().can_decide_as(stage)
    }

    /// Returns the inner claims.
    #[must_use]
    pub fn claims(&self) -> &Claims {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "UNAUTHORIZED",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn user(id: &str, role: &str) -> AuthUser {
        AuthUser(Claims::new(
            EmployeeId::parse(id).unwrap(),
            role,
            Utc::now() + Duration::hours(1),
        ))
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_view_rights() {
        let employee = user("E001", "employee");
        let other = EmployeeId::parse("E002").unwrap();
        assert!(employee.can_view(&EmployeeId::parse("E001").unwrap()));
        assert!(!employee.can_view(&other));
        assert!(user("HR001", "hr").can_view(&other));
    }

    #[test]
    fn test_unknown_role_is_employee() {
        let odd = user("X1", "chairman");
        assert_eq!(odd.role(), StaffRole::Employee);
        assert!(!odd.can_decide_as(ApproverRole::Hr));
    }
}
