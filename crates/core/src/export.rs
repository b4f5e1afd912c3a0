//! Flat rows for the spreadsheet export.
//!
//! Field names double as CSV headers.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use leaveflow_shared::types::{EmployeeId, LeaveRequestId};

use crate::directory::StaffMember;
use crate::leave::LeaveRequest;
use crate::leave::types::ApproverRole;
use crate::ledger::LeaveBalanceRecord;

/// One employee's figures for one leave type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceRow {
    /// Employee code.
    #[serde(rename = "Emp ID")]
    pub employee_id: EmployeeId,
    /// Display name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Job title.
    #[serde(rename = "Designation")]
    pub designation: String,
    /// Directory role.
    #[serde(rename = "Role")]
    pub role: String,
    /// Leave type label.
    #[serde(rename = "Leave Type")]
    pub leave_type: &'static str,
    /// Days granted.
    #[serde(rename = "Allotted")]
    pub allotted: Decimal,
    /// Days used.
    #[serde(rename = "Consumed")]
    pub consumed: Decimal,
    /// Days left; may be negative.
    #[serde(rename = "Remaining")]
    pub remaining: Decimal,
}

/// One leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveRequestRow {
    /// Request ID.
    #[serde(rename = "Leave ID")]
    pub leave_id: LeaveRequestId,
    /// Employee code.
    #[serde(rename = "Emp ID")]
    pub employee_id: EmployeeId,
    /// Display name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Leave type label.
    #[serde(rename = "Leave Type")]
    pub leave_type: &'static str,
    /// First day.
    #[serde(rename = "From")]
    pub from: NaiveDate,
    /// Last day.
    #[serde(rename = "To")]
    pub to: NaiveDate,
    /// Inclusive day count.
    #[serde(rename = "Days")]
    pub days: u32,
    /// Site Incharge decision.
    #[serde(rename = "Site Incharge")]
    pub site_incharge: &'static str,
    /// HR decision.
    #[serde(rename = "HR")]
    pub hr: &'static str,
    /// SBU Head decision.
    #[serde(rename = "SBU Head")]
    pub sbu_head: &'static str,
    /// Status label.
    #[serde(rename = "Final Status")]
    pub final_status: &'static str,
    /// Latest remarks.
    #[serde(rename = "Remarks")]
    pub remarks: String,
    /// Submission time.
    #[serde(rename = "Submitted At")]
    pub submitted_at: DateTime<Utc>,
}

/// Everything the export contains, at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSnapshot {
    /// When the snapshot was taken.
    pub generated_at: DateTime<Utc>,
    /// Balance rows, by employee then leave type.
    pub balances: Vec<BalanceRow>,
    /// Request rows, oldest submission first.
    pub requests: Vec<LeaveRequestRow>,
}

/// Builds the export rows from plain records.
#[must_use]
pub fn snapshot(
    staff: &[StaffMember],
    ledgers: &[LeaveBalanceRecord],
    requests: &[LeaveRequest],
    generated_at: DateTime<Utc>,
) -> ExportSnapshot {
    let directory: HashMap<&EmployeeId, &StaffMember> =
        staff.iter().map(|member| (&member.employee_id, member)).collect();

    let mut ledgers: Vec<&LeaveBalanceRecord> = ledgers.iter().collect();
    ledgers.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));

    let balances = ledgers
        .into_iter()
        .flat_map(|record| {
            let member = directory.get(&record.employee_id).copied();
            record.lines().into_iter().map(move |line| BalanceRow {
                employee_id: record.employee_id.clone(),
                name: member.map(|m| m.name.clone()).unwrap_or_default(),
                designation: member.map(|m| m.designation.clone()).unwrap_or_default(),
                role: member.map(|m| m.role.as_str().to_string()).unwrap_or_default(),
                leave_type: line.leave_type.label(),
                allotted: line.allotted,
                consumed: line.consumed,
                remaining: line.remaining,
            })
        })
        .collect();

    let mut requests: Vec<&LeaveRequest> = requests.iter().collect();
    requests.sort_by_key(|r| (r.submitted_at, r.id));

    let requests = requests
        .into_iter()
        .map(|request| {
            let decisions = &request.approval.stage_decisions;
            LeaveRequestRow {
                leave_id: request.id,
                employee_id: request.employee_id.clone(),
                name: directory
                    .get(&request.employee_id)
                    .map(|m| m.name.clone())
                    .unwrap_or_default(),
                leave_type: request.leave_type.label(),
                from: request.date_range.start(),
                to: request.date_range.end(),
                days: request.duration_days,
                site_incharge: decisions.get(ApproverRole::SiteIncharge).label(),
                hr: decisions.get(ApproverRole::Hr).label(),
                sbu_head: decisions.get(ApproverRole::SbuHead).label(),
                final_status: request.status().label(),
                remarks: request.approval.remarks.clone().unwrap_or_default(),
                submitted_at: request.submitted_at,
            }
        })
        .collect();

    ExportSnapshot {
        generated_at,
        balances,
        requests,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use rust_decimal_macros::dec;

    use crate::auth::StaffRole;
    use crate::leave::{DateRange, Decision, LeaveType, WorkflowService};

    fn member(id: &str, name: &str) -> StaffMember {
        StaffMember {
            employee_id: EmployeeId::parse(id).unwrap(),
            name: name.to_string(),
            designation: "Engineer".to_string(),
            role: StaffRole::Employee,
            department: "Operations".to_string(),
            date_of_joining: None,
            contact_info: None,
            password_hash: String::new(),
            security_question: None,
            security_answer_hash: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_snapshot_rows() {
        let staff = vec![member("E001", "Asha")];
        let mut ledger = LeaveBalanceRecord::new(
            EmployeeId::parse("E001").unwrap(),
            BTreeMap::from([(LeaveType::Casual, dec!(12))]),
        );
        ledger.apply_approved(LeaveType::Casual, 3);

        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
        )
        .unwrap();
        let mut request = WorkflowService::submit(
            EmployeeId::parse("E001").unwrap(),
            LeaveType::Casual,
            range,
            Utc::now(),
        );
        WorkflowService::decide(
            &mut request.approval,
            ApproverRole::SiteIncharge,
            Decision::Approved,
            Some("ok".to_string()),
            Utc::now(),
        )
        .unwrap();

        let export = snapshot(&staff, &[ledger], &[request], Utc::now());

        assert_eq!(export.balances.len(), LeaveType::ALL.len());
        let casual = &export.balances[0];
        assert_eq!(casual.name, "Asha");
        assert_eq!(casual.leave_type, "Casual Leave");
        assert_eq!(casual.remaining, dec!(9));

        assert_eq!(export.requests.len(), 1);
        let row = &export.requests[0];
        assert_eq!(row.days, 3);
        assert_eq!(row.site_incharge, "Approved");
        assert_eq!(row.hr, "Pending");
        assert_eq!(row.final_status, "Pending at HR");
        assert_eq!(row.remarks, "ok");
    }

    #[test]
    fn test_unknown_staff_name_is_blank() {
        let ledger = LeaveBalanceRecord::new(EmployeeId::parse("E404").unwrap(), BTreeMap::new());
        let export = snapshot(&[], &[ledger], &[], Utc::now());
        assert!(export.balances.iter().all(|row| row.name.is_empty()));
    }
}
