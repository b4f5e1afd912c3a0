//! Leave balance ledger.
//!
//! - `balance` - Per-employee record and its arithmetic
//! - `service` - Locked, storage-backed ledger operations

pub mod balance;
pub mod service;

#[cfg(test)]
mod service_props;

pub use balance::{Allotments, BalanceLine, LeaveBalanceRecord, policy_allotments};
pub use service::BalanceLedger;
