//! Property-based tests for the balance record arithmetic.

use std::collections::BTreeMap;

use proptest::prelude::*;
use rust_decimal::Decimal;

use leaveflow_shared::types::EmployeeId;

use crate::leave::LeaveType;
use crate::ledger::balance::LeaveBalanceRecord;

fn arb_leave_type() -> impl Strategy<Value = LeaveType> {
    prop::sample::select(LeaveType::ALL.to_vec())
}

fn record(allotted: u32) -> LeaveBalanceRecord {
    LeaveBalanceRecord::new(
        EmployeeId::parse("E001").unwrap(),
        LeaveType::ALL
            .into_iter()
            .map(|t| (t, Decimal::from(allotted)))
            .collect::<BTreeMap<_, _>>(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// remaining == allotted - consumed for any posting history.
    #[test]
    fn prop_remaining_is_allotted_minus_consumed(
        allotted in 0u32..60,
        postings in prop::collection::vec((arb_leave_type(), 1u32..10), 0..20),
    ) {
        let mut record = record(allotted);
        for &(leave_type, days) in &postings {
            record.apply_approved(leave_type, days);
        }
        for leave_type in LeaveType::ALL {
            let used: u32 = postings.iter().filter(|(t, _)| *t == leave_type).map(|(_, d)| d).sum();
            prop_assert_eq!(record.consumed(leave_type), Decimal::from(used));
            prop_assert_eq!(
                record.remaining(leave_type),
                Decimal::from(allotted) - Decimal::from(used)
            );
        }
    }

    /// Reversing every posting restores the starting balance.
    #[test]
    fn prop_unapprove_reverses_approve(
        allotted in 0u32..60,
        postings in prop::collection::vec((arb_leave_type(), 1u32..10), 0..20),
    ) {
        let mut record = record(allotted);
        for &(leave_type, days) in &postings {
            record.apply_approved(leave_type, days);
        }
        for &(leave_type, days) in postings.iter().rev() {
            record.apply_unapproved(leave_type, days);
        }
        for leave_type in LeaveType::ALL {
            prop_assert_eq!(record.consumed(leave_type), Decimal::ZERO);
            prop_assert_eq!(record.remaining(leave_type), Decimal::from(allotted));
        }
    }
}
