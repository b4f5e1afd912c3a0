//! Storage contracts for leave data.
//!
//! The manager depends on these traits only. [`InMemoryStore`] implements
//! all three and is what the server runs with.

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use leaveflow_shared::types::{CancellationId, EmployeeId, LeaveRequestId};

use crate::directory::StaffMember;
use crate::leave::{CancellationRequest, LeaveRequest};
use crate::ledger::LeaveBalanceRecord;

/// Storage backend failure.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// The backend could not be reached or refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Leave and cancellation request storage.
#[async_trait]
pub trait LeaveRepository: Send + Sync {
    /// Loads one leave request.
    async fn load_request(&self, id: LeaveRequestId) -> Result<Option<LeaveRequest>, RepositoryError>;

    /// Inserts or replaces a leave request.
    async fn save_request(&self, request: &LeaveRequest) -> Result<(), RepositoryError>;

    /// Returns every leave request, in no particular order.
    async fn list_requests(&self) -> Result<Vec<LeaveRequest>, RepositoryError>;

    /// Loads one cancellation request.
    async fn load_cancellation(
        &self,
        id: CancellationId,
    ) -> Result<Option<CancellationRequest>, RepositoryError>;

    /// Inserts or replaces a cancellation request.
    async fn save_cancellation(&self, cancellation: &CancellationRequest) -> Result<(), RepositoryError>;

    /// Returns every cancellation request, in no particular order.
    async fn list_cancellations(&self) -> Result<Vec<CancellationRequest>, RepositoryError>;
}

/// Per-employee balance ledger storage.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Loads one employee's ledger row.
    async fn load_ledger(&self, employee_id: &EmployeeId) -> Result<Option<LeaveBalanceRecord>, RepositoryError>;

    /// Inserts or replaces a ledger row.
    async fn save_ledger(&self, record: &LeaveBalanceRecord) -> Result<(), RepositoryError>;

    /// Deletes a ledger row. Used to undo a half-finished registration.
    async fn remove_ledger(&self, employee_id: &EmployeeId) -> Result<(), RepositoryError>;

    /// Returns every ledger row, in no particular order.
    async fn list_ledgers(&self) -> Result<Vec<LeaveBalanceRecord>, RepositoryError>;
}

/// Staff directory storage.
#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Loads one staff member.
    async fn load_staff(&self, employee_id: &EmployeeId) -> Result<Option<StaffMember>, RepositoryError>;

    /// Inserts or replaces a staff member.
    async fn save_staff(&self, member: &StaffMember) -> Result<(), RepositoryError>;

    /// Returns every staff member, in no particular order.
    async fn list_staff(&self) -> Result<Vec<StaffMember>, RepositoryError>;
}
