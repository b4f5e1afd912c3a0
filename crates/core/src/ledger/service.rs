//! Balance ledger service.
//!
//! Every mutation for one employee runs under that employee's lock, so
//! concurrent postings land exactly as if applied one after another.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use leaveflow_shared::types::EmployeeId;

use crate::leave::{LeaveError, LeaveType};
use crate::ledger::balance::{Allotments, LeaveBalanceRecord};
use crate::locks::KeyedLocks;
use crate::repository::LedgerRepository;

/// Per-employee allotment and consumption ledger.
///
/// The workflow is the only caller of [`BalanceLedger::on_approved`] and
/// [`BalanceLedger::on_unapproved`], once per edge into or out of final
/// approval.
pub struct BalanceLedger {
    repo: Arc<dyn LedgerRepository>,
    locks: KeyedLocks<EmployeeId>,
}

impl BalanceLedger {
    /// Creates a ledger over the given storage.
    #[must_use]
    pub fn new(repo: Arc<dyn LedgerRepository>) -> Self {
        Self {
            repo,
            locks: KeyedLocks::new(),
        }
    }

    /// Seeds a new ledger row.
    ///
    /// # Errors
    /// * `LeaveError::Duplicate` if the employee already has a row
    pub async fn create_employee(
        &self,
        employee_id: &EmployeeId,
        allotments: Allotments,
    ) -> Result<LeaveBalanceRecord, LeaveError> {
        let _guard = self.locks.lock(employee_id).await;
        if self.repo.load_ledger(employee_id).await?.is_some() {
            return Err(LeaveError::Duplicate(employee_id.clone()));
        }
        let record = LeaveBalanceRecord::new(employee_id.clone(), allotments);
        self.repo.save_ledger(&record).await?;
        debug!(employee_id = %employee_id, "ledger row created");
        Ok(record)
    }

    /// Drops a ledger row. Only used to undo a failed registration.
    pub(crate) async fn remove_employee(&self, employee_id: &EmployeeId) -> Result<(), LeaveError> {
        let _guard = self.locks.lock(employee_id).await;
        self.repo.remove_ledger(employee_id).await?;
        Ok(())
    }

    /// Records consumption for a request that reached final approval.
    pub async fn on_approved(
        &self,
        employee_id: &EmployeeId,
        leave_type: LeaveType,
        duration_days: u32,
    ) -> Result<LeaveBalanceRecord, LeaveError> {
        self.post(employee_id, |record| record.apply_approved(leave_type, duration_days))
            .await
            .inspect(|record| {
                debug!(
                    employee_id = %employee_id,
                    leave_type = %leave_type,
                    days = duration_days,
                    remaining = %record.remaining(leave_type),
                    "leave consumed"
                );
            })
    }

    /// Returns consumption for a request that left final approval.
    pub async fn on_unapproved(
        &self,
        employee_id: &EmployeeId,
        leave_type: LeaveType,
        duration_days: u32,
    ) -> Result<LeaveBalanceRecord, LeaveError> {
        self.post(employee_id, |record| record.apply_unapproved(leave_type, duration_days))
            .await
            .inspect(|record| {
                debug!(
                    employee_id = %employee_id,
                    leave_type = %leave_type,
                    days = duration_days,
                    remaining = %record.remaining(leave_type),
                    "leave returned"
                );
            })
    }

    /// `allotted - consumed` for one leave type; may be negative.
    pub async fn remaining(
        &self,
        employee_id: &EmployeeId,
        leave_type: LeaveType,
    ) -> Result<Decimal, LeaveError> {
        Ok(self.balance(employee_id).await?.remaining(leave_type))
    }

    /// Full record for one employee.
    pub async fn balance(&self, employee_id: &EmployeeId) -> Result<LeaveBalanceRecord, LeaveError> {
        self.repo
            .load_ledger(employee_id)
            .await?
            .ok_or_else(|| LeaveError::EmployeeNotFound(employee_id.clone()))
    }

    /// Returns true if the employee has a ledger row.
    pub async fn exists(&self, employee_id: &EmployeeId) -> Result<bool, LeaveError> {
        Ok(self.repo.load_ledger(employee_id).await?.is_some())
    }

    /// Every ledger row, ordered by employee id.
    pub async fn all(&self) -> Result<Vec<LeaveBalanceRecord>, LeaveError> {
        let mut records = self.repo.list_ledgers().await?;
        records.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        Ok(records)
    }

    async fn post(
        &self,
        employee_id: &EmployeeId,
        apply: impl FnOnce(&mut LeaveBalanceRecord),
    ) -> Result<LeaveBalanceRecord, LeaveError> {
        let _guard = self.locks.lock(employee_id).await;
        let mut record = self.balance(employee_id).await?;
        apply(&mut record);
        self.repo.save_ledger(&record).await?;
        Ok(record)
    }
}
