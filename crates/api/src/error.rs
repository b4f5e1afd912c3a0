//! JSON error responses.
//!
//! Every failure leaves the API as `{"error": <code>, "message": <text>}`
//! with the status code of its kind.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use leaveflow_core::leave::LeaveError;
use leaveflow_shared::AppError;

/// Builds the response for an application error.
///
/// Server-side failures are logged and their details withheld.
pub fn app_error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = if err.is_client_error() {
        err.message().to_string()
    } else {
        error!(error = %err, "request failed");
        "An internal error occurred".to_string()
    };
    (
        status,
        Json(json!({ "error": err.error_code(), "message": message })),
    )
        .into_response()
}

/// Builds the response for a failed leave operation.
pub fn error_response(err: LeaveError) -> Response {
    app_error_response(&AppError::from(err))
}

/// 403 with a short explanation.
pub fn forbidden(message: &str) -> Response {
    app_error_response(&AppError::Forbidden(message.to_string()))
}

/// 400 with a short explanation.
pub fn bad_request(message: impl Into<String>) -> Response {
    app_error_response(&AppError::Validation(message.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaveflow_shared::types::LeaveRequestId;

    #[test]
    fn test_leave_error_status() {
        let response = error_response(LeaveError::RequestNotFound(LeaveRequestId::new()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = error_response(LeaveError::Unauthorized);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_forbidden_and_bad_request() {
        assert_eq!(forbidden("no").status(), StatusCode::FORBIDDEN);
        assert_eq!(bad_request("bad").status(), StatusCode::BAD_REQUEST);
    }
}
