//! Staff directory routes.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{bad_request, error_response, forbidden};
use crate::{AppState, middleware::AuthUser};
use leaveflow_core::auth::StaffRole;
use leaveflow_core::directory::{NewStaff, StaffMember};
use leaveflow_core::leave::LeaveType;
use leaveflow_core::ledger::BalanceLine;
use leaveflow_shared::types::EmployeeId;

/// Creates the staff routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/staff", get(list_staff).post(create_staff))
        .route("/staff/{employee_id}/balance", get(get_balance))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for registering a staff member.
#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    /// Employee code.
    pub employee_id: String,
    /// Display name.
    pub name: String,
    /// Job title.
    #[serde(default)]
    pub designation: String,
    /// Staff role (`employee`, `site_incharge`, `hr`, `sbu_head`, `admin`).
    pub role: String,
    /// Department.
    #[serde(default)]
    pub department: String,
    /// Joining date (YYYY-MM-DD).
    pub date_of_joining: Option<NaiveDate>,
    /// Phone or email.
    pub contact_info: Option<String>,
    /// Initial password.
    pub password: String,
    /// Password recovery question.
    pub security_question: Option<String>,
    /// Answer to the recovery question.
    pub security_answer: Option<String>,
    /// Days per leave type; omitted types get nothing, omitted map gets the policy.
    pub allotments: Option<BTreeMap<LeaveType, Decimal>>,
}

/// Query parameters for listing staff.
#[derive(Debug, Deserialize)]
pub struct ListStaffQuery {
    /// Only this role.
    pub role: Option<String>,
}

/// Staff member as returned by the API.
#[derive(Debug, Serialize)]
pub struct StaffResponse {
    /// Employee code.
    pub employee_id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Job title.
    pub designation: String,
    /// Staff role.
    pub role: StaffRole,
    /// Department.
    pub department: String,
    /// Joining date.
    pub date_of_joining: Option<NaiveDate>,
    /// Phone or email.
    pub contact_info: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<StaffMember> for StaffResponse {
    fn from(member: StaffMember) -> Self {
        Self {
            employee_id: member.employee_id,
            name: member.name,
            designation: member.designation,
            role: member.role,
            department: member.department,
            date_of_joining: member.date_of_joining,
            contact_info: member.contact_info,
            created_at: member.created_at,
        }
    }
}

/// Balance of one employee.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Employee code.
    pub employee_id: EmployeeId,
    /// Figures per leave type.
    pub balances: Vec<BalanceLine>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /staff - Register a staff member (admin only).
async fn create_staff(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateStaffRequest>,
) -> impl IntoResponse {
    if !auth.role().can_manage_staff() {
        return forbidden("Only administrators can register staff");
    }

    let employee_id = match EmployeeId::parse(&payload.employee_id) {
        Ok(id) => id,
        Err(e) => return bad_request(e.to_string()),
    };
    let Some(role) = StaffRole::parse(&payload.role) else {
        return bad_request(format!("Unknown role: {}", payload.role));
    };

    let new_staff = NewStaff {
        employee_id,
        name: payload.name,
        designation: payload.designation,
        role,
        department: payload.department,
        date_of_joining: payload.date_of_joining,
        contact_info: payload.contact_info,
        password: payload.password,
        security_question: payload.security_question,
        security_answer: payload.security_answer,
        allotments: payload.allotments,
    };

    match state.manager.register_staff(new_staff).await {
        Ok(member) => (StatusCode::CREATED, Json(StaffResponse::from(member))).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /staff - List staff (approvers and admins).
async fn list_staff(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListStaffQuery>,
) -> impl IntoResponse {
    if !auth.role().can_view_all() {
        return forbidden("Only approvers and administrators can list staff");
    }

    let role = match query.role.as_deref().map(StaffRole::parse) {
        None => None,
        Some(Some(role)) => Some(role),
        Some(None) => return bad_request("Unknown role filter"),
    };

    match state.manager.list_staff(role).await {
        Ok(staff) => {
            let staff: Vec<StaffResponse> = staff.into_iter().map(StaffResponse::from).collect();
            (StatusCode::OK, Json(json!({ "staff": staff }))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /staff/{employee_id}/balance - Leave balance of one employee.
async fn get_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(employee_id): Path<String>,
) -> impl IntoResponse {
    let employee_id = match EmployeeId::parse(&employee_id) {
        Ok(id) => id,
        Err(e) => return bad_request(e.to_string()),
    };
    if !auth.can_view(&employee_id) {
        return forbidden("You can only view your own balance");
    }

    match state.manager.balance(&employee_id).await {
        Ok(record) => (
            StatusCode::OK,
            Json(BalanceResponse {
                balances: record.lines(),
                employee_id: record.employee_id,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
