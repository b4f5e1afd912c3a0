//! Approval state machine for leave and cancellation requests.
//!
//! Status is never set directly. It is derived from the three stage
//! decisions after every change:
//!
//! 1. any stage `Rejected` gives `Rejected`;
//! 2. all stages `Approved` gives `ApprovedFinal`;
//! 3. otherwise the request waits on the first stage still `Pending`.

use chrono::{DateTime, Utc};

use leaveflow_shared::types::{CancellationId, EmployeeId, LeaveRequestId};

use crate::leave::error::LeaveError;
use crate::leave::types::{
    ApprovalState, ApproverRole, CancellationRequest, DateRange, Decision, DecisionEvent,
    LeaveRequest, LeaveStatus, LeaveType, StageDecisions,
};

/// Status change caused by one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Status before.
    pub from: LeaveStatus,
    /// Status after.
    pub to: LeaveStatus,
}

impl Transition {
    /// True when this change moved the request into `ApprovedFinal`.
    #[must_use]
    pub fn entered_final(&self) -> bool {
        self.from != LeaveStatus::ApprovedFinal && self.to == LeaveStatus::ApprovedFinal
    }

    /// True when this change moved the request out of `ApprovedFinal`.
    #[must_use]
    pub fn left_final(&self) -> bool {
        self.from == LeaveStatus::ApprovedFinal && self.to != LeaveStatus::ApprovedFinal
    }

    /// True when the status changed at all.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Stateless service for leave workflow transitions.
///
/// All methods are associated functions over plain values; persistence and
/// locking live in [`crate::manager::LeaveManager`].
pub struct WorkflowService;

impl WorkflowService {
    /// Derives the status from stage decisions.
    #[must_use]
    pub fn derive_status(decisions: &StageDecisions) -> LeaveStatus {
        if decisions.iter().any(|(_, d)| d == Decision::Rejected) {
            return LeaveStatus::Rejected;
        }
        decisions
            .iter()
            .find(|(_, d)| *d != Decision::Approved)
            .map_or(LeaveStatus::ApprovedFinal, |(role, _)| role.pending_status())
    }

    /// Builds a freshly submitted leave request.
    ///
    /// # Arguments
    /// * `employee_id` - The requesting employee
    /// * `leave_type` - Leave category
    /// * `date_range` - Already validated dates
    /// * `now` - Submission timestamp
    #[must_use]
    pub fn submit(
        employee_id: EmployeeId,
        leave_type: LeaveType,
        date_range: DateRange,
        now: DateTime<Utc>,
    ) -> LeaveRequest {
        LeaveRequest {
            id: LeaveRequestId::new(),
            employee_id,
            leave_type,
            duration_days: date_range.duration_days(),
            date_range,
            approval: ApprovalState::new(),
            submitted_at: now,
            latest_cancellation_id: None,
        }
    }

    /// Records one stage's decision and recomputes the status.
    ///
    /// The stage's previous decision is replaced. Remarks are stored as the
    /// latest remarks and in the history entry.
    ///
    /// # Returns
    /// * `Ok(Transition)` describing the status before and after
    /// * `Err(LeaveError::InvalidStage)` if the status is already terminal
    /// * `Err(LeaveError::Validation)` if `decision` is `Pending`
    pub fn decide(
        state: &mut ApprovalState,
        role: ApproverRole,
        decision: Decision,
        remarks: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Transition, LeaveError> {
        if state.status.is_terminal() {
            return Err(LeaveError::InvalidStage {
                status: state.status,
                action: "record a decision",
            });
        }
        if decision == Decision::Pending {
            return Err(LeaveError::Validation(
                "decision must be approved or rejected".to_string(),
            ));
        }

        let remarks = remarks
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        let from = state.status;

        state.stage_decisions.set(role, decision);
        state.status = Self::derive_status(&state.stage_decisions);
        state.remarks.clone_from(&remarks);
        state.history.push(DecisionEvent {
            role,
            decision,
            remarks,
            decided_at: now,
        });

        Ok(Transition {
            from,
            to: state.status,
        })
    }

    /// Opens a cancellation request against a final-approved leave request.
    ///
    /// `open_cancellation` is the request's latest cancellation, if any.
    ///
    /// # Returns
    /// * `Err(LeaveError::Validation)` if `reason` is blank
    /// * `Err(LeaveError::InvalidStage)` unless the request is `ApprovedFinal`
    /// * `Err(LeaveError::CancellationInProgress)` if the latest cancellation is still pending
    pub fn open_cancellation(
        request: &LeaveRequest,
        open_cancellation: Option<&CancellationRequest>,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<CancellationRequest, LeaveError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(LeaveError::Validation(
                "cancellation reason is required".to_string(),
            ));
        }
        if request.status() != LeaveStatus::ApprovedFinal {
            return Err(LeaveError::InvalidStage {
                status: request.status(),
                action: "request cancellation",
            });
        }
        if open_cancellation.is_some_and(|c| !c.status().is_terminal()) {
            return Err(LeaveError::CancellationInProgress(request.id));
        }

        Ok(CancellationRequest {
            id: CancellationId::new(),
            leave_request_id: request.id,
            employee_id: request.employee_id.clone(),
            reason: reason.to_string(),
            approval: ApprovalState::new(),
            requested_at: now,
        })
    }

    /// Flips a final-approved request to `Cancelled`.
    ///
    /// Called once the cancellation request itself reaches `ApprovedFinal`.
    pub fn mark_cancelled(request: &mut LeaveRequest) -> Result<Transition, LeaveError> {
        let from = request.status();
        if from != LeaveStatus::ApprovedFinal {
            return Err(LeaveError::InvalidStage {
                status: from,
                action: "cancel",
            });
        }
        request.approval.status = LeaveStatus::Cancelled;
        Ok(Transition {
            from,
            to: LeaveStatus::Cancelled,
        })
    }
}
