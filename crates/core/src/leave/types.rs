//! Leave request domain types.
//!
//! A request carries its own approval state: one decision per approver
//! stage, the derived status, and the audit trail of every decision.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use leaveflow_shared::types::{CancellationId, EmployeeId, LeaveRequestId};

use crate::leave::error::LeaveError;

/// Category of leave. Closed set; immutable once a request is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Casual leave (CL).
    Casual,
    /// Compensatory off (CO).
    CompOff,
    /// Half-day casual leave.
    HalfDayCasual,
    /// Leave without pay (LWP).
    LeaveWithoutPay,
    /// Gazetted-holiday adjustment (GH).
    GazettedHoliday,
}

impl LeaveType {
    /// Every leave type, in display order.
    pub const ALL: [Self; 5] = [
        Self::Casual,
        Self::CompOff,
        Self::HalfDayCasual,
        Self::LeaveWithoutPay,
        Self::GazettedHoliday,
    ];

    /// Returns the string representation of the leave type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::CompOff => "comp_off",
            Self::HalfDayCasual => "half_day_casual",
            Self::LeaveWithoutPay => "leave_without_pay",
            Self::GazettedHoliday => "gazetted_holiday",
        }
    }

    /// Human-readable name used in exports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Casual => "Casual Leave",
            Self::CompOff => "Comp Off",
            Self::HalfDayCasual => "Half Day Casual Leave",
            Self::LeaveWithoutPay => "Leave Without Pay",
            Self::GazettedHoliday => "Gazetted Holiday Adjustment",
        }
    }

    /// Parses a leave type from its tag or its display name.
    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(needle) || t.label().eq_ignore_ascii_case(needle))
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the three approval stages, in their fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApproverRole {
    /// First stage.
    SiteIncharge,
    /// Second stage.
    Hr,
    /// Third and final stage.
    SbuHead,
}

impl ApproverRole {
    /// Stages in the order a request passes through them.
    pub const ORDER: [Self; 3] = [Self::SiteIncharge, Self::Hr, Self::SbuHead];

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SiteIncharge => "site_incharge",
            Self::Hr => "hr",
            Self::SbuHead => "sbu_head",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SiteIncharge => "Site Incharge",
            Self::Hr => "HR",
            Self::SbuHead => "SBU Head",
        }
    }

    /// Parses a role from its tag (`site_incharge`, `hr`, `sbu_head`).
    ///
    /// The compact forms `siteincharge` and `sbuhead` are accepted too.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "site_incharge" | "siteincharge" => Some(Self::SiteIncharge),
            "hr" => Some(Self::Hr),
            "sbu_head" | "sbuhead" => Some(Self::SbuHead),
            _ => None,
        }
    }

    /// The pending status shown while this stage is the next to act.
    #[must_use]
    pub const fn pending_status(&self) -> LeaveStatus {
        match self {
            Self::SiteIncharge => LeaveStatus::PendingSiteIncharge,
            Self::Hr => LeaveStatus::PendingHr,
            Self::SbuHead => LeaveStatus::PendingSbuHead,
        }
    }
}

impl fmt::Display for ApproverRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stage's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Not decided yet.
    #[default]
    Pending,
    /// Stage approved.
    Approved,
    /// Stage rejected.
    Rejected,
}

impl Decision {
    /// Returns the string representation of the decision.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a decision; `approve` and `reject` are accepted too.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" | "approve" => Some(Self::Approved),
            "rejected" | "reject" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

/// Derived status of a leave request (or of a cancellation request).
///
/// The stored value is the snake_case tag; [`LeaveStatus::label`] gives the
/// wording shown to people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Waiting for the Site Incharge.
    PendingSiteIncharge,
    /// Waiting for HR.
    PendingHr,
    /// Waiting for the SBU Head.
    PendingSbuHead,
    /// All three stages approved.
    ApprovedFinal,
    /// At least one stage rejected.
    Rejected,
    /// A final approval later withdrawn through a cancellation request.
    Cancelled,
}

impl LeaveStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PendingSiteIncharge => "pending_site_incharge",
            Self::PendingHr => "pending_hr",
            Self::PendingSbuHead => "pending_sbu_head",
            Self::ApprovedFinal => "approved_final",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Display wording.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PendingSiteIncharge => "Pending at Site Incharge",
            Self::PendingHr => "Pending at HR",
            Self::PendingSbuHead => "Pending at SBU Head",
            Self::ApprovedFinal => "Approved (Final)",
            Self::Rejected => "Rejected",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Parses a status from its tag.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending_site_incharge" => Some(Self::PendingSiteIncharge),
            "pending_hr" => Some(Self::PendingHr),
            "pending_sbu_head" => Some(Self::PendingSbuHead),
            "approved_final" => Some(Self::ApprovedFinal),
            "rejected" => Some(Self::Rejected),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true once no further decisions may be recorded.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::ApprovedFinal | Self::Rejected | Self::Cancelled)
    }

    /// The stage whose turn it is, for pending statuses.
    #[must_use]
    pub const fn awaiting(&self) -> Option<ApproverRole> {
        match self {
            Self::PendingSiteIncharge => Some(ApproverRole::SiteIncharge),
            Self::PendingHr => Some(ApproverRole::Hr),
            Self::PendingSbuHead => Some(ApproverRole::SbuHead),
            Self::ApprovedFinal | Self::Rejected | Self::Cancelled => None,
        }
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive date range. Invariant: `end >= start`.
///
/// Deserialization goes through [`DateRange::new`], so stored data cannot
/// produce an inverted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = LeaveError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Creates a range, rejecting `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, LeaveError> {
        if end < start {
            return Err(LeaveError::Validation(format!(
                "end date {end} is before start date {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Creates a range from optional form input; both dates are required.
    pub fn from_parts(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, LeaveError> {
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end),
            (None, _) => Err(LeaveError::Validation("start date is required".to_string())),
            (Some(_), None) => Err(LeaveError::Validation("end date is required".to_string())),
        }
    }

    /// First day of leave.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of leave.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive day count: `(end - start) + 1`.
    #[must_use]
    pub fn duration_days(&self) -> u32 {
        let span = (self.end - self.start).num_days();
        u32::try_from(span + 1).unwrap_or(u32::MAX)
    }
}

/// One decision per approver stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StageDecisions {
    /// Site Incharge decision.
    pub site_incharge: Decision,
    /// HR decision.
    pub hr: Decision,
    /// SBU Head decision.
    pub sbu_head: Decision,
}

impl StageDecisions {
    /// Returns the decision recorded for `role`.
    #[must_use]
    pub const fn get(&self, role: ApproverRole) -> Decision {
        match role {
            ApproverRole::SiteIncharge => self.site_incharge,
            ApproverRole::Hr => self.hr,
            ApproverRole::SbuHead => self.sbu_head,
        }
    }

    /// Overwrites the decision for `role`.
    pub fn set(&mut self, role: ApproverRole, decision: Decision) {
        match role {
            ApproverRole::SiteIncharge => self.site_incharge = decision,
            ApproverRole::Hr => self.hr = decision,
            ApproverRole::SbuHead => self.sbu_head = decision,
        }
    }

    /// Iterates `(role, decision)` in stage order.
    pub fn iter(&self) -> impl Iterator<Item = (ApproverRole, Decision)> + '_ {
        ApproverRole::ORDER.into_iter().map(|role| (role, self.get(role)))
    }
}

/// Audit record of one recorded decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionEvent {
    /// Stage that decided.
    pub role: ApproverRole,
    /// What it decided.
    pub decision: Decision,
    /// Remarks attached to the decision.
    pub remarks: Option<String>,
    /// When the decision was recorded.
    pub decided_at: DateTime<Utc>,
}

/// Approval state shared by leave requests and cancellation requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalState {
    /// Decision per stage.
    pub stage_decisions: StageDecisions,
    /// Derived status.
    pub status: LeaveStatus,
    /// Remarks from the latest decision (last write wins).
    pub remarks: Option<String>,
    /// Every decision recorded, oldest first.
    pub history: Vec<DecisionEvent>,
}

impl ApprovalState {
    /// Fresh state: every stage pending, waiting for the Site Incharge.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stage_decisions: StageDecisions::default(),
            status: LeaveStatus::PendingSiteIncharge,
            remarks: None,
            history: Vec::new(),
        }
    }
}

impl Default for ApprovalState {
    fn default() -> Self {
        Self::new()
    }
}

/// A leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Request ID.
    pub id: LeaveRequestId,
    /// Requesting employee.
    pub employee_id: EmployeeId,
    /// Leave category.
    pub leave_type: LeaveType,
    /// Requested dates.
    pub date_range: DateRange,
    /// Inclusive day count, fixed at submission.
    pub duration_days: u32,
    /// Approval state.
    #[serde(flatten)]
    pub approval: ApprovalState,
    /// Submission time.
    pub submitted_at: DateTime<Utc>,
    /// Most recent cancellation request raised against this request.
    pub latest_cancellation_id: Option<CancellationId>,
}

impl LeaveRequest {
    /// Current status.
    #[must_use]
    pub const fn status(&self) -> LeaveStatus {
        self.approval.status
    }
}

/// Request to withdraw a final approval. Runs its own three-stage chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationRequest {
    /// Cancellation ID.
    pub id: CancellationId,
    /// The approved leave request to cancel.
    pub leave_request_id: LeaveRequestId,
    /// Owner of that leave request.
    pub employee_id: EmployeeId,
    /// Why the leave should be withdrawn.
    pub reason: String,
    /// Approval state of the cancellation itself.
    #[serde(flatten)]
    pub approval: ApprovalState,
    /// When cancellation was requested.
    pub requested_at: DateTime<Utc>,
}

impl CancellationRequest {
    /// Current status.
    #[must_use]
    pub const fn status(&self) -> LeaveStatus {
        self.approval.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_deserialize_checks_order() {
        let range: DateRange =
            serde_json::from_str(r#"{"start":"2024-01-10","end":"2024-01-12"}"#).unwrap();
        assert_eq!(range.duration_days(), 3);

        let inverted = serde_json::from_str::<DateRange>(r#"{"start":"2024-01-12","end":"2024-01-10"}"#);
        assert!(inverted.is_err());
    }

    #[test]
    fn test_duration_is_inclusive() {
        let range = DateRange::new(date(2024, 1, 10), date(2024, 1, 12)).unwrap();
        assert_eq!(range.duration_days(), 3);

        let single = DateRange::new(date(2024, 1, 10), date(2024, 1, 10)).unwrap();
        assert_eq!(single.duration_days(), 1);
    }

    #[test]
    fn test_duration_across_leap_day() {
        let range = DateRange::new(date(2024, 2, 28), date(2024, 3, 1)).unwrap();
        assert_eq!(range.duration_days(), 3);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = DateRange::new(date(2024, 1, 12), date(2024, 1, 10));
        assert!(matches!(result, Err(LeaveError::Validation(_))));
    }

    #[test]
    fn test_missing_dates_rejected() {
        assert!(matches!(
            DateRange::from_parts(None, Some(date(2024, 1, 1))),
            Err(LeaveError::Validation(_))
        ));
        assert!(matches!(
            DateRange::from_parts(Some(date(2024, 1, 1)), None),
            Err(LeaveError::Validation(_))
        ));
        assert!(DateRange::from_parts(Some(date(2024, 1, 1)), Some(date(2024, 1, 1))).is_ok());
    }

    #[rstest]
    #[case("casual", LeaveType::Casual)]
    #[case("Casual Leave", LeaveType::Casual)]
    #[case("COMP_OFF", LeaveType::CompOff)]
    #[case("half_day_casual", LeaveType::HalfDayCasual)]
    #[case("Leave Without Pay", LeaveType::LeaveWithoutPay)]
    #[case("gazetted_holiday", LeaveType::GazettedHoliday)]
    fn test_leave_type_parse(#[case] raw: &str, #[case] expected: LeaveType) {
        assert_eq!(LeaveType::parse(raw), Some(expected));
    }

    #[test]
    fn test_leave_type_parse_unknown() {
        assert_eq!(LeaveType::parse("sabbatical"), None);
    }

    #[rstest]
    #[case(LeaveStatus::PendingSiteIncharge, "Pending at Site Incharge")]
    #[case(LeaveStatus::PendingHr, "Pending at HR")]
    #[case(LeaveStatus::PendingSbuHead, "Pending at SBU Head")]
    #[case(LeaveStatus::ApprovedFinal, "Approved (Final)")]
    #[case(LeaveStatus::Rejected, "Rejected")]
    #[case(LeaveStatus::Cancelled, "Cancelled")]
    fn test_status_labels(#[case] status: LeaveStatus, #[case] label: &str) {
        assert_eq!(status.label(), label);
        assert_eq!(LeaveStatus::parse(status.as_str()), Some(status));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!LeaveStatus::PendingSiteIncharge.is_terminal());
        assert!(!LeaveStatus::PendingHr.is_terminal());
        assert!(!LeaveStatus::PendingSbuHead.is_terminal());
        assert!(LeaveStatus::ApprovedFinal.is_terminal());
        assert!(LeaveStatus::Rejected.is_terminal());
        assert!(LeaveStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_awaiting_matches_pending_status() {
        for role in ApproverRole::ORDER {
            assert_eq!(role.pending_status().awaiting(), Some(role));
        }
        assert_eq!(LeaveStatus::ApprovedFinal.awaiting(), None);
    }

    #[test]
    fn test_stage_decisions_get_set() {
        let mut decisions = StageDecisions::default();
        assert!(decisions.iter().all(|(_, d)| d == Decision::Pending));

        decisions.set(ApproverRole::Hr, Decision::Approved);
        assert_eq!(decisions.get(ApproverRole::Hr), Decision::Approved);
        assert_eq!(decisions.get(ApproverRole::SiteIncharge), Decision::Pending);

        let order: Vec<_> = decisions.iter().map(|(role, _)| role).collect();
        assert_eq!(order, ApproverRole::ORDER.to_vec());
    }

    #[test]
    fn test_status_serializes_as_tag() {
        let json = serde_json::to_string(&LeaveStatus::ApprovedFinal).unwrap();
        assert_eq!(json, "\"approved_final\"");
        let json = serde_json::to_string(&ApproverRole::SbuHead).unwrap();
        assert_eq!(json, "\"sbu_head\"");
    }
}
