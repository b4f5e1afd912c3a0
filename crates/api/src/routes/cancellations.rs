//! Cancellation request routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use tracing::info;

use crate::error::{bad_request, error_response, forbidden};
use crate::routes::leave_requests::DecisionRequest;
use crate::{AppState, middleware::AuthUser};
use leaveflow_core::leave::CancellationRequest;
use leaveflow_shared::types::CancellationId;

/// Creates the cancellation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cancellations/{cancellation_id}", get(get_cancellation))
        .route("/cancellations/{cancellation_id}/decisions", post(record_decision))
}

/// Cancellation request as returned by the API.
#[derive(Debug, Serialize)]
pub struct CancellationResponse {
    /// The cancellation request.
    #[serde(flatten)]
    pub cancellation: CancellationRequest,
    /// Display wording of the status.
    pub status_label: &'static str,
}

impl From<CancellationRequest> for CancellationResponse {
    fn from(cancellation: CancellationRequest) -> Self {
        Self {
            status_label: cancellation.status().label(),
            cancellation,
        }
    }
}

/// GET /cancellations/{cancellation_id} - Get one cancellation request.
async fn get_cancellation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(cancellation_id): Path<CancellationId>,
) -> impl IntoResponse {
    match state.manager.get_cancellation(cancellation_id).await {
        Ok(cancellation) if auth.can_view(&cancellation.employee_id) => (
            StatusCode::OK,
            Json(CancellationResponse::from(cancellation)),
        )
            .into_response(),
        Ok(_) => forbidden("You can only view your own cancellations"),
        Err(e) => error_response(e),
    }
}

/// POST /cancellations/{cancellation_id}/decisions - Record an approver decision.
async fn record_decision(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(cancellation_id): Path<CancellationId>,
    Json(payload): Json<DecisionRequest>,
) -> impl IntoResponse {
    let (role, decision) = match payload.parse() {
        Ok(parsed) => parsed,
        Err(message) => return bad_request(message),
    };
    if !auth.can_decide_as(role) {
        return forbidden("Your role cannot decide for this approval stage");
    }

    match state
        .manager
        .record_cancellation_decision(cancellation_id, role, decision, payload.remarks)
        .await
    {
        Ok(cancellation) => {
            info!(
                cancellation_id = %cancellation_id,
                decided_by = %auth.employee_id(),
                role = %role,
                "Cancellation decision recorded via API"
            );
            (StatusCode::OK, Json(CancellationResponse::from(cancellation))).into_response()
        }
        Err(e) => error_response(e),
    }
}
