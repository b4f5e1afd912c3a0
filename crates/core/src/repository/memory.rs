//! In-process storage backed by `dashmap`.

use async_trait::async_trait;
use dashmap::DashMap;

use leaveflow_shared::types::{CancellationId, EmployeeId, LeaveRequestId};

use crate::directory::StaffMember;
use crate::leave::{CancellationRequest, LeaveRequest};
use crate::ledger::LeaveBalanceRecord;
use crate::repository::{LeaveRepository, LedgerRepository, RepositoryError, StaffRepository};

/// Concurrent in-memory store for requests, ledgers and staff.
///
/// Contents live as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    requests: DashMap<LeaveRequestId, LeaveRequest>,
    cancellations: DashMap<CancellationId, CancellationRequest>,
    ledgers: DashMap<EmployeeId, LeaveBalanceRecord>,
    staff: DashMap<EmployeeId, StaffMember>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeaveRepository for InMemoryStore {
    async fn load_request(&self, id: LeaveRequestId) -> Result<Option<LeaveRequest>, RepositoryError> {
        Ok(self.requests.get(&id).map(|r| r.value().clone()))
    }

    async fn save_request(&self, request: &LeaveRequest) -> Result<(), RepositoryError> {
        self.requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn list_requests(&self) -> Result<Vec<LeaveRequest>, RepositoryError> {
        Ok(self.requests.iter().map(|r| r.value().clone()).collect())
    }

    async fn load_cancellation(
        &self,
        id: CancellationId,
    ) -> Result<Option<CancellationRequest>, RepositoryError> {
        Ok(self.cancellations.get(&id).map(|c| c.value().clone()))
    }

    async fn save_cancellation(&self, cancellation: &CancellationRequest) -> Result<(), RepositoryError> {
        self.cancellations.insert(cancellation.id, cancellation.clone());
        Ok(())
    }

    async fn list_cancellations(&self) -> Result<Vec<CancellationRequest>, RepositoryError> {
        Ok(self.cancellations.iter().map(|c| c.value().clone()).collect())
    }
}

#[async_trait]
impl LedgerRepository for InMemoryStore {
    async fn load_ledger(&self, employee_id: &EmployeeId) -> Result<Option<LeaveBalanceRecord>, RepositoryError> {
        Ok(self.ledgers.get(employee_id).map(|r| r.value().clone()))
    }

    async fn save_ledger(&self, record: &LeaveBalanceRecord) -> Result<(), RepositoryError> {
        self.ledgers.insert(record.employee_id.clone(), record.clone());
        Ok(())
    }

    async fn remove_ledger(&self, employee_id: &EmployeeId) -> Result<(), RepositoryError> {
        self.ledgers.remove(employee_id);
        Ok(())
    }

    async fn list_ledgers(&self) -> Result<Vec<LeaveBalanceRecord>, RepositoryError> {
        Ok(self.ledgers.iter().map(|r| r.value().clone()).collect())
    }
}

#[async_trait]
impl StaffRepository for InMemoryStore {
    async fn load_staff(&self, employee_id: &EmployeeId) -> Result<Option<StaffMember>, RepositoryError> {
        Ok(self.staff.get(employee_id).map(|s| s.value().clone()))
    }

    async fn save_staff(&self, member: &StaffMember) -> Result<(), RepositoryError> {
        self.staff.insert(member.employee_id.clone(), member.clone());
        Ok(())
    }

    async fn list_staff(&self) -> Result<Vec<StaffMember>, RepositoryError> {
        Ok(self.staff.iter().map(|s| s.value().clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use rust_decimal_macros::dec;

    use crate::leave::LeaveType;

    #[tokio::test]
    async fn test_ledger_save_load_remove() {
        let store = InMemoryStore::new();
        let employee = EmployeeId::parse("E001").unwrap();
        let record = LeaveBalanceRecord::new(
            employee.clone(),
            BTreeMap::from([(LeaveType::Casual, dec!(12))]),
        );

        assert!(store.load_ledger(&employee).await.unwrap().is_none());
        store.save_ledger(&record).await.unwrap();
        assert_eq!(store.load_ledger(&employee).await.unwrap(), Some(record));
        assert_eq!(store.list_ledgers().await.unwrap().len(), 1);

        store.remove_ledger(&employee).await.unwrap();
        assert!(store.load_ledger(&employee).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_request_is_none() {
        let store = InMemoryStore::new();
        assert!(store.load_request(LeaveRequestId::new()).await.unwrap().is_none());
        assert!(store.load_cancellation(CancellationId::new()).await.unwrap().is_none());
        assert!(store.list_requests().await.unwrap().is_empty());
    }
}
