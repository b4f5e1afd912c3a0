//! Per-employee leave balance record.
//!
//! `remaining = allotted - consumed` per leave type. Over-consumption is
//! allowed and shows up as a negative remaining balance.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use leaveflow_shared::config::LeavePolicyConfig;
use leaveflow_shared::types::EmployeeId;

use crate::leave::LeaveType;

/// Days allotted per leave type.
pub type Allotments = BTreeMap<LeaveType, Decimal>;

/// Builds the default allotments from the configured leave policy.
#[must_use]
pub fn policy_allotments(policy: &LeavePolicyConfig) -> Allotments {
    BTreeMap::from([
        (LeaveType::Casual, policy.casual),
        (LeaveType::CompOff, policy.comp_off),
        (LeaveType::HalfDayCasual, policy.half_day_casual),
        (LeaveType::LeaveWithoutPay, policy.leave_without_pay),
        (LeaveType::GazettedHoliday, policy.gazetted_holiday),
    ])
}

/// Allotment and consumption for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalanceRecord {
    /// Owner of the record.
    pub employee_id: EmployeeId,
    /// Days granted per type. Missing types count as zero.
    pub allotted: Allotments,
    /// Days used by final-approved requests per type.
    pub consumed: BTreeMap<LeaveType, Decimal>,
}

/// One leave type's figures, for display and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceLine {
    /// Leave type.
    pub leave_type: LeaveType,
    /// Days granted.
    pub allotted: Decimal,
    /// Days used.
    pub consumed: Decimal,
    /// `allotted - consumed`; may be negative.
    pub remaining: Decimal,
}

impl LeaveBalanceRecord {
    /// Creates a record with nothing consumed.
    #[must_use]
    pub fn new(employee_id: EmployeeId, allotted: Allotments) -> Self {
        Self {
            employee_id,
            allotted,
            consumed: BTreeMap::new(),
        }
    }

    /// Days granted for `leave_type`.
    #[must_use]
    pub fn allotted(&self, leave_type: LeaveType) -> Decimal {
        self.allotted.get(&leave_type).copied().unwrap_or_default()
    }

    /// Days used for `leave_type`.
    #[must_use]
    pub fn consumed(&self, leave_type: LeaveType) -> Decimal {
        self.consumed.get(&leave_type).copied().unwrap_or_default()
    }

    /// `allotted - consumed`, unclamped.
    #[must_use]
    pub fn remaining(&self, leave_type: LeaveType) -> Decimal {
        self.allotted(leave_type) - self.consumed(leave_type)
    }

    /// Adds `days` to consumption.
    pub fn apply_approved(&mut self, leave_type: LeaveType, days: u32) {
        *self.consumed.entry(leave_type).or_default() += Decimal::from(days);
    }

    /// Gives `days` back.
    pub fn apply_unapproved(&mut self, leave_type: LeaveType, days: u32) {
        *self.consumed.entry(leave_type).or_default() -= Decimal::from(days);
    }

    /// Figures for every leave type, in display order.
    #[must_use]
    pub fn lines(&self) -> Vec<BalanceLine> {
        LeaveType::ALL
            .into_iter()
            .map(|leave_type| BalanceLine {
                leave_type,
                allotted: self.allotted(leave_type),
                consumed: self.consumed(leave_type),
                remaining: self.remaining(leave_type),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record() -> LeaveBalanceRecord {
        LeaveBalanceRecord::new(
            EmployeeId::parse("E001").unwrap(),
            BTreeMap::from([(LeaveType::Casual, dec!(12)), (LeaveType::CompOff, dec!(2))]),
        )
    }

    #[test]
    fn test_new_record_has_full_balance() {
        let record = record();
        assert_eq!(record.remaining(LeaveType::Casual), dec!(12));
        assert_eq!(record.consumed(LeaveType::Casual), Decimal::ZERO);
    }

    #[test]
    fn test_missing_allotment_is_zero() {
        let record = record();
        assert_eq!(record.allotted(LeaveType::LeaveWithoutPay), Decimal::ZERO);
        assert_eq!(record.remaining(LeaveType::LeaveWithoutPay), Decimal::ZERO);
    }

    #[test]
    fn test_approve_then_unapprove_restores() {
        let mut record = record();
        record.apply_approved(LeaveType::Casual, 3);
        assert_eq!(record.remaining(LeaveType::Casual), dec!(9));

        record.apply_unapproved(LeaveType::Casual, 3);
        assert_eq!(record.consumed(LeaveType::Casual), Decimal::ZERO);
        assert_eq!(record.remaining(LeaveType::Casual), dec!(12));
    }

    #[test]
    fn test_overconsumption_goes_negative() {
        let mut record = record();
        record.apply_approved(LeaveType::CompOff, 5);
        assert_eq!(record.remaining(LeaveType::CompOff), dec!(-3));
    }

    #[test]
    fn test_lines_cover_every_type() {
        let mut record = record();
        record.apply_approved(LeaveType::Casual, 1);
        let lines = record.lines();

        assert_eq!(lines.len(), LeaveType::ALL.len());
        assert_eq!(lines[0].leave_type, LeaveType::Casual);
        assert_eq!(lines[0].remaining, dec!(11));
    }

    #[test]
    fn test_policy_allotments() {
        let allotments = policy_allotments(&LeavePolicyConfig::default());
        assert_eq!(allotments.get(&LeaveType::Casual), Some(&dec!(12)));
        assert_eq!(allotments.get(&LeaveType::CompOff), Some(&Decimal::ZERO));
    }
}
