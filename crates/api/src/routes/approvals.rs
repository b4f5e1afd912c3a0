//! Approver queue routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;

use crate::error::{bad_request, error_response, forbidden};
use crate::routes::cancellations::CancellationResponse;
use crate::routes::leave_requests::LeaveRequestResponse;
use crate::{AppState, middleware::AuthUser};
use leaveflow_core::leave::ApproverRole;

/// Creates the approval queue routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/approvals/{role}", get(approval_queue))
}

/// Everything waiting on one approver stage, oldest first.
#[derive(Debug, Serialize)]
pub struct ApprovalQueueResponse {
    /// The stage.
    pub role: ApproverRole,
    /// Leave requests at this stage.
    pub leave_requests: Vec<LeaveRequestResponse>,
    /// Cancellation requests at this stage.
    pub cancellations: Vec<CancellationResponse>,
}

/// GET /approvals/{role} - Queue for an approver stage.
async fn approval_queue(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(role): Path<String>,
) -> impl IntoResponse {
    let Some(role) = ApproverRole::parse(&role) else {
        return bad_request(format!("Unknown approver role: {role}"));
    };
    if !auth.can_decide_as(role) {
        return forbidden("Your role cannot see this approval queue");
    }

    let leave_requests = match state.manager.pending_for(role).await {
        Ok(requests) => requests,
        Err(e) => return error_response(e),
    };
    let cancellations = match state.manager.pending_cancellations_for(role).await {
        Ok(cancellations) => cancellations,
        Err(e) => return error_response(e),
    };

    (
        StatusCode::OK,
        Json(ApprovalQueueResponse {
            role,
            leave_requests: leave_requests.into_iter().map(Into::into).collect(),
            cancellations: cancellations.into_iter().map(Into::into).collect(),
        }),
    )
        .into_response()
}
