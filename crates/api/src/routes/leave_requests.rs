//! Leave request routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{bad_request, error_response, forbidden};
use crate::routes::cancellations::CancellationResponse;
use crate::{AppState, middleware::AuthUser};
use leaveflow_core::RequestFilter;
use leaveflow_core::auth::StaffRole;
use leaveflow_core::leave::{ApproverRole, DateRange, Decision, LeaveRequest, LeaveStatus, LeaveType};
use leaveflow_shared::types::{EmployeeId, LeaveRequestId, PageRequest};

/// Creates the leave request routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/leave-requests", get(list_requests).post(submit_request))
        .route("/leave-requests/{request_id}", get(get_request))
        .route("/leave-requests/{request_id}/decisions", post(record_decision))
        .route("/leave-requests/{request_id}/cancellations", post(request_cancellation))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for submitting leave.
#[derive(Debug, Deserialize)]
pub struct SubmitLeaveRequest {
    /// Employee the leave is for; defaults to the caller.
    pub employee_id: Option<String>,
    /// Leave type tag or display name.
    pub leave_type: String,
    /// First day (YYYY-MM-DD).
    pub start_date: Option<NaiveDate>,
    /// Last day (YYYY-MM-DD).
    pub end_date: Option<NaiveDate>,
}

/// Query parameters for listing leave requests.
#[derive(Debug, Deserialize)]
pub struct ListRequestsQuery {
    /// Filter by employee.
    pub employee_id: Option<String>,
    /// Filter by status tag.
    pub status: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default: 20, max: 100).
    pub per_page: Option<u32>,
}

/// Request body for an approver decision.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    /// Approver stage (`site_incharge`, `hr`, `sbu_head`).
    pub role: String,
    /// `approved` or `rejected`.
    pub decision: String,
    /// Optional remarks.
    pub remarks: Option<String>,
}

impl DecisionRequest {
    /// Parses role and decision, or returns the message for a 400.
    pub fn parse(&self) -> Result<(ApproverRole, Decision), String> {
        let role = ApproverRole::parse(&self.role)
            .ok_or_else(|| format!("Unknown approver role: {}", self.role))?;
        let decision = Decision::parse(&self.decision)
            .ok_or_else(|| format!("Unknown decision: {}", self.decision))?;
        Ok((role, decision))
    }
}

/// Request body for asking to cancel an approved leave.
#[derive(Debug, Deserialize)]
pub struct CancellationBody {
    /// Why the leave should be withdrawn.
    #[serde(default)]
    pub reason: String,
}

/// Leave request as returned by the API.
#[derive(Debug, Serialize)]
pub struct LeaveRequestResponse {
    /// The request.
    #[serde(flatten)]
    pub request: LeaveRequest,
    /// Display wording of the status.
    pub status_label: &'static str,
}

impl From<LeaveRequest> for LeaveRequestResponse {
    fn from(request: LeaveRequest) -> Self {
        Self {
            status_label: request.status().label(),
            request,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /leave-requests - Submit leave.
async fn submit_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SubmitLeaveRequest>,
) -> impl IntoResponse {
    let employee_id = match payload.employee_id.as_deref().map(EmployeeId::parse) {
        None => auth.employee_id().clone(),
        Some(Ok(id)) => id,
        Some(Err(e)) => return bad_request(e.to_string()),
    };
    if &employee_id != auth.employee_id() && auth.role() != StaffRole::Admin {
        return forbidden("You can only submit leave for yourself");
    }

    let Some(leave_type) = LeaveType::parse(&payload.leave_type) else {
        return bad_request(format!("Unknown leave type: {}", payload.leave_type));
    };
    let date_range = match DateRange::from_parts(payload.start_date, payload.end_date) {
        Ok(range) => range,
        Err(e) => return error_response(e),
    };

    match state.manager.submit(&employee_id, leave_type, date_range).await {
        Ok(request) => {
            (StatusCode::CREATED, Json(LeaveRequestResponse::from(request))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /leave-requests - List leave requests, newest first.
///
/// Employees only ever see their own requests.
async fn list_requests(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListRequestsQuery>,
) -> impl IntoResponse {
    let requested = match query.employee_id.as_deref().map(EmployeeId::parse) {
        None => None,
        Some(Ok(id)) => Some(id),
        Some(Err(e)) => return bad_request(e.to_string()),
    };
    let employee_id = if auth.role().can_view_all() {
        requested
    } else {
        match requested {
            Some(id) if &id != auth.employee_id() => {
                return forbidden("You can only view your own leave requests");
            }
            _ => Some(auth.employee_id().clone()),
        }
    };
    let status = match query.status.as_deref().map(LeaveStatus::parse) {
        None => None,
        Some(Some(status)) => Some(status),
        Some(None) => return bad_request("Unknown status filter"),
    };

    let page = PageRequest {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    };

    match state
        .manager
        .list_requests(&RequestFilter { employee_id, status })
        .await
    {
        Ok(requests) => {
            let requests: Vec<LeaveRequestResponse> =
                requests.into_iter().map(LeaveRequestResponse::from).collect();
            (StatusCode::OK, Json(page.paginate(requests))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /leave-requests/{request_id} - Get one leave request.
async fn get_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<LeaveRequestId>,
) -> impl IntoResponse {
    match state.manager.get_request(request_id).await {
        Ok(request) if auth.can_view(&request.employee_id) => {
            (StatusCode::OK, Json(LeaveRequestResponse::from(request))).into_response()
        }
        Ok(_) => forbidden("You can only view your own leave requests"),
        Err(e) => error_response(e),
    }
}

/// POST /leave-requests/{request_id}/decisions - Record an approver decision.
async fn record_decision(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<LeaveRequestId>,
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
        .record_decision(request_id, role, decision, payload.remarks)
        .await
    {
        Ok(request) => {
            info!(
                request_id = %request_id,
                decided_by = %auth.employee_id(),
                role = %role,
                "Decision recorded via API"
            );
            (StatusCode::OK, Json(LeaveRequestResponse::from(request))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST /leave-requests/{request_id}/cancellations - Ask to cancel approved leave.
///
/// Only the requesting employee or an administrator may ask.
async fn request_cancellation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<LeaveRequestId>,
    Json(payload): Json<CancellationBody>,
) -> impl IntoResponse {
    let request = match state.manager.get_request(request_id).await {
        Ok(request) => request,
        Err(e) => return error_response(e),
    };
    if &request.employee_id != auth.employee_id() && auth.role() != StaffRole::Admin {
        return forbidden("You can only cancel your own leave");
    }

    match state
        .manager
        .request_cancellation(request_id, &payload.reason)
        .await
    {
        Ok(cancellation) => (
            StatusCode::CREATED,
            Json(CancellationResponse::from(cancellation)),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
