//! Login and password recovery routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use crate::error::{app_error_response, bad_request, error_response};
use leaveflow_core::leave::LeaveError;
use leaveflow_shared::AppError;
use leaveflow_shared::auth::{LoginRequest, LoginResponse};
use leaveflow_shared::types::EmployeeId;

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/security-question/{employee_id}", get(security_question))
        .route("/auth/reset-password", post(reset_password))
}

/// Request body for a password reset.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    /// Employee code.
    pub employee_id: String,
    /// Answer to the account's security question.
    pub security_answer: String,
    /// Replacement password.
    pub new_password: String,
}

/// Security question of one account.
#[derive(Debug, Serialize)]
pub struct SecurityQuestionResponse {
    /// Employee code.
    pub employee_id: EmployeeId,
    /// The question to answer.
    pub security_question: String,
}

/// POST /auth/login - Check credentials and issue an access token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let member = match state
        .manager
        .authenticate(&payload.employee_id, &payload.password)
        .await
    {
        Ok(member) => member,
        Err(LeaveError::Unauthorized) => {
            info!(employee_id = %payload.employee_id, "Failed login attempt");
            return error_response(LeaveError::Unauthorized);
        }
        Err(e) => return error_response(e),
    };

    let access_token = match state
        .jwt_service
        .generate_access_token(&member.employee_id, member.role.as_str())
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return app_error_response(&AppError::Internal(e.to_string()));
        }
    };

    info!(employee_id = %member.employee_id, role = %member.role, "Staff logged in");

    let response = LoginResponse {
        staff: member.info(),
        access_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// GET /auth/security-question/{employee_id} - First step of password recovery.
async fn security_question(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> impl IntoResponse {
    let employee_id = match EmployeeId::parse(&employee_id) {
        Ok(id) => id,
        Err(e) => return bad_request(e.to_string()),
    };

    match state.manager.security_question(&employee_id).await {
        Ok(Some(question)) => (
            StatusCode::OK,
            Json(SecurityQuestionResponse {
                employee_id,
                security_question: question,
            }),
        )
            .into_response(),
        Ok(None) => bad_request("No security question is set for this account"),
        Err(e) => error_response(e),
    }
}

/// POST /auth/reset-password - Set a new password after answering the security question.
async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> impl IntoResponse {
    if payload.security_answer.trim().is_empty() {
        return bad_request("Security answer is required");
    }

    match state
        .manager
        .reset_password(
            &payload.employee_id,
            &payload.security_answer,
            &payload.new_password,
        )
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Password has been reset" })),
        )
            .into_response(),
        Err(LeaveError::Unauthorized) => {
            info!(employee_id = %payload.employee_id, "Failed password reset attempt");
            error_response(LeaveError::Unauthorized)
        }
        Err(e) => error_response(e),
    }
}
