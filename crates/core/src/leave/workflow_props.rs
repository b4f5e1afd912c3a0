//! Property-based tests for WorkflowService.

use chrono::{Duration, NaiveDate, Utc};
use proptest::prelude::*;

use crate::leave::types::{ApprovalState, ApproverRole, DateRange, Decision, LeaveStatus};
use crate::leave::workflow::WorkflowService;

fn arb_role() -> impl Strategy<Value = ApproverRole> {
    prop_oneof![
        Just(ApproverRole::SiteIncharge),
        Just(ApproverRole::Hr),
        Just(ApproverRole::SbuHead),
    ]
}

fn arb_decision() -> impl Strategy<Value = Decision> {
    prop_oneof![Just(Decision::Approved), Just(Decision::Rejected)]
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    // 2000-01-01 plus up to ~50 years
    (0i64..18_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Duration::days(offset)
    })
}

/// Applies decisions until the state becomes terminal, like the manager does.
fn replay(steps: &[(ApproverRole, Decision)]) -> (ApprovalState, usize) {
    let mut state = ApprovalState::new();
    let mut entered_final = 0;
    for &(role, decision) in steps {
        if let Ok(transition) = WorkflowService::decide(&mut state, role, decision, None, Utc::now())
        {
            if transition.entered_final() {
                entered_final += 1;
            }
        }
    }
    (state, entered_final)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Inclusive day count for every valid range.
    #[test]
    fn prop_duration_is_inclusive(start in arb_date(), span in 0i64..400) {
        let end = start + Duration::days(span);
        let range = DateRange::new(start, end).unwrap();
        prop_assert_eq!(i64::from(range.duration_days()), span + 1);
    }

    /// Inverted ranges never validate.
    #[test]
    fn prop_inverted_range_rejected(start in arb_date(), span in 1i64..400) {
        let end = start - Duration::days(span);
        prop_assert!(DateRange::new(start, end).is_err());
    }

    /// Rejected iff some stage rejected.
    #[test]
    fn prop_rejected_iff_any_rejection(
        steps in prop::collection::vec((arb_role(), arb_decision()), 0..10)
    ) {
        let (state, _) = replay(&steps);
        let any_rejected = state.stage_decisions.iter().any(|(_, d)| d == Decision::Rejected);
        prop_assert_eq!(state.status == LeaveStatus::Rejected, any_rejected);
    }

    /// ApprovedFinal iff all three stages approved.
    #[test]
    fn prop_final_iff_all_approved(
        steps in prop::collection::vec((arb_role(), arb_decision()), 0..10)
    ) {
        let (state, entered_final) = replay(&steps);
        let all_approved = state.stage_decisions.iter().all(|(_, d)| d == Decision::Approved);
        prop_assert_eq!(state.status == LeaveStatus::ApprovedFinal, all_approved);
        prop_assert!(entered_final <= 1);
        prop_assert_eq!(entered_final == 1, all_approved);
    }

    /// Status is always the derived status of the recorded decisions.
    #[test]
    fn prop_status_matches_derivation(
        steps in prop::collection::vec((arb_role(), arb_decision()), 0..10)
    ) {
        let (state, _) = replay(&steps);
        prop_assert_eq!(state.status, WorkflowService::derive_status(&state.stage_decisions));
    }

    /// The three approvals reach ApprovedFinal in any order.
    #[test]
    fn prop_approval_order_independent(order in Just(ApproverRole::ORDER.to_vec()).prop_shuffle()) {
        let steps: Vec<_> = order.into_iter().map(|r| (r, Decision::Approved)).collect();
        let (state, entered_final) = replay(&steps);
        prop_assert_eq!(state.status, LeaveStatus::ApprovedFinal);
        prop_assert_eq!(entered_final, 1);
    }

    /// A single rejection is final wherever it lands in the sequence.
    #[test]
    fn prop_rejection_short_circuits(
        rejecter in arb_role(),
        before in prop::collection::vec(arb_role(), 0..3),
    ) {
        let mut steps: Vec<_> = before
            .into_iter()
            .filter(|r| *r != rejecter)
            .map(|r| (r, Decision::Approved))
            .collect();
        steps.push((rejecter, Decision::Rejected));
        steps.extend(ApproverRole::ORDER.into_iter().map(|r| (r, Decision::Approved)));

        let (state, entered_final) = replay(&steps);
        prop_assert_eq!(state.status, LeaveStatus::Rejected);
        prop_assert_eq!(entered_final, 0);
    }
}
