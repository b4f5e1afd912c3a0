//! Leave manager: the workflow wired to storage and the balance ledger.
//!
//! Locks are taken in a fixed order: cancellation, then request, then
//! employee (inside [`BalanceLedger`]). Validation runs before any write;
//! when a later write fails, earlier writes from the same call are undone.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use leaveflow_shared::types::{CancellationId, EmployeeId, LeaveRequestId};

use crate::auth::{self, StaffRole};
use crate::directory::{NewStaff, StaffMember};
use crate::export::{self, ExportSnapshot};
use crate::leave::{
    ApproverRole, CancellationRequest, DateRange, Decision, LeaveError, LeaveRequest, LeaveStatus,
    LeaveType, WorkflowService,
};
use crate::ledger::{Allotments, BalanceLedger, LeaveBalanceRecord};
use crate::locks::KeyedLocks;
use crate::repository::{InMemoryStore, LeaveRepository, LedgerRepository, StaffRepository};


/// Filter for [`LeaveManager::list_requests`].
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    /// Only this employee's requests.
    pub employee_id: Option<EmployeeId>,
    /// Only requests in this status.
    pub status: Option<LeaveStatus>,
}

impl RequestFilter {
    fn matches(&self, request: &LeaveRequest) -> bool {
        self.employee_id
            .as_ref()
            .is_none_or(|id| *id == request.employee_id)
            && self.status.is_none_or(|status| status == request.status())
    }
}

/// Entry point for every leave operation.
///
/// `Send + Sync`; share it behind an `Arc`.
pub struct LeaveManager {
    requests: Arc<dyn LeaveRepository>,
    staff: Arc<dyn StaffRepository>,
    ledger: BalanceLedger,
    default_allotments: Allotments,
    request_locks: KeyedLocks<LeaveRequestId>,
    cancellation_locks: KeyedLocks<CancellationId>,
}

impl LeaveManager {
    /// Creates a manager over the given storage.
    ///
    /// `default_allotments` seeds the ledger of staff registered without
    /// explicit allotments.
    #[must_use]
    pub fn new(
        requests: Arc<dyn LeaveRepository>,
        ledgers: Arc<dyn LedgerRepository>,
        staff: Arc<dyn StaffRepository>,
        default_allotments: Allotments,
    ) -> Self {
        Self {
            requests,
            staff,
            ledger: BalanceLedger::new(ledgers),
            default_allotments,
            request_locks: KeyedLocks::new(),
            cancellation_locks: KeyedLocks::new(),
        }
    }

    /// Creates a manager backed by one fresh [`InMemoryStore`].
    #[must_use]
    pub fn in_memory(default_allotments: Allotments) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(store.clone(), store.clone(), store, default_allotments)
    }

    // ------------------------------------------------------------------
    // Leave requests
    // ------------------------------------------------------------------

    /// Submits a leave request.
    ///
    /// # Errors
    /// * `LeaveError::EmployeeNotFound` if the employee has no ledger row
    pub async fn submit(
        &self,
        employee_id: &EmployeeId,
        leave_type: LeaveType,
        date_range: DateRange,
    ) -> Result<LeaveRequest, LeaveError> {
        if !self.ledger.exists(employee_id).await? {
            return Err(LeaveError::EmployeeNotFound(employee_id.clone()));
        }

        let request = WorkflowService::submit(employee_id.clone(), leave_type, date_range, Utc::now());
        self.requests.save_request(&request).await?;

        info!(
            request_id = %request.id,
            employee_id = %employee_id,
            leave_type = %leave_type,
            days = request.duration_days,
            "leave request submitted"
        );
        Ok(request)
    }

    /// Records an approver stage's decision on a leave request.
    ///
    /// Posts consumption to the ledger when the request enters final
    /// approval.
    pub async fn record_decision(
        &self,
        request_id: LeaveRequestId,
        role: ApproverRole,
        decision: Decision,
        remarks: Option<String>,
    ) -> Result<LeaveRequest, LeaveError> {
        let _guard = self.request_locks.lock(&request_id).await;

        let previous = self.load_request(request_id).await?;
        let mut request = previous.clone();
        let transition =
            WorkflowService::decide(&mut request.approval, role, decision, remarks, Utc::now())?;
        self.requests.save_request(&request).await?;

        if transition.entered_final() {
            if let Err(err) = self
                .ledger
                .on_approved(&request.employee_id, request.leave_type, request.duration_days)
                .await
            {
                warn!(request_id = %request_id, error = %err, "ledger posting failed, restoring request");
                self.requests.save_request(&previous).await?;
                return Err(err);
            }
        }

        info!(
            request_id = %request_id,
            role = %role,
            decision = decision.as_str(),
            from = %transition.from,
            to = %transition.to,
            "decision recorded"
        );
        Ok(request)
    }

    /// Opens a cancellation request for a final-approved leave request.
    pub async fn request_cancellation(
        &self,
        request_id: LeaveRequestId,
        reason: &str,
    ) -> Result<CancellationRequest, LeaveError> {
        let _guard = self.request_locks.lock(&request_id).await;

        let mut request = self.load_request(request_id).await?;
        let latest = match request.latest_cancellation_id {
            Some(id) => self.requests.load_cancellation(id).await?,
            None => None,
        };
        let cancellation =
            WorkflowService::open_cancellation(&request, latest.as_ref(), reason, Utc::now())?;

        self.requests.save_cancellation(&cancellation).await?;
        request.latest_cancellation_id = Some(cancellation.id);
        self.requests.save_request(&request).await?;

        info!(
            request_id = %request_id,
            cancellation_id = %cancellation.id,
            "cancellation requested"
        );
        Ok(cancellation)
    }

    /// Records an approver stage's decision on a cancellation request.
    ///
    /// When the cancellation reaches final approval, the leave request
    /// becomes `Cancelled` and its days go back to the ledger. A rejected
    /// cancellation leaves the leave request untouched.
    pub async fn record_cancellation_decision(
        &self,
        cancellation_id: CancellationId,
        role: ApproverRole,
        decision: Decision,
        remarks: Option<String>,
    ) -> Result<CancellationRequest, LeaveError> {
        let _cancellation_guard = self.cancellation_locks.lock(&cancellation_id).await;

        let mut cancellation = self
            .requests
            .load_cancellation(cancellation_id)
            .await?
            .ok_or(LeaveError::CancellationNotFound(cancellation_id))?;
        let transition =
            WorkflowService::decide(&mut cancellation.approval, role, decision, remarks, Utc::now())?;

        if transition.entered_final() {
            let _request_guard = self.request_locks.lock(&cancellation.leave_request_id).await;
            self.cancel_leave(&cancellation).await?;
        } else {
            self.requests.save_cancellation(&cancellation).await?;
        }

        info!(
            cancellation_id = %cancellation_id,
            role = %role,
            decision = decision.as_str(),
            from = %transition.from,
            to = %transition.to,
            "cancellation decision recorded"
        );
        Ok(cancellation)
    }

    /// Flips the leave request to `Cancelled`, returns its days, and saves
    /// the approved cancellation. Caller holds both locks.
    async fn cancel_leave(&self, cancellation: &CancellationRequest) -> Result<(), LeaveError> {
        let previous = self.load_request(cancellation.leave_request_id).await?;
        let mut request = previous.clone();
        WorkflowService::mark_cancelled(&mut request)?;
        self.requests.save_request(&request).await?;

        if let Err(err) = self
            .ledger
            .on_unapproved(&request.employee_id, request.leave_type, request.duration_days)
            .await
        {
            warn!(request_id = %request.id, error = %err, "ledger reversal failed, restoring request");
            self.requests.save_request(&previous).await?;
            return Err(err);
        }

        if let Err(err) = self.requests.save_cancellation(cancellation).await {
            warn!(
                cancellation_id = %cancellation.id,
                error = %err,
                "saving cancellation failed, undoing reversal"
            );
            // Request first: it must leave `Cancelled` even if the re-post fails.
            if let Err(restore) = self.requests.save_request(&previous).await {
                error!(request_id = %request.id, error = %restore, "restoring request failed");
            }
            if let Err(repost) = self
                .ledger
                .on_approved(&request.employee_id, request.leave_type, request.duration_days)
                .await
            {
                error!(
                    employee_id = %request.employee_id,
                    error = %repost,
                    "re-posting consumption failed, ledger needs manual correction"
                );
            }
            return Err(err.into());
        }

        info!(
            request_id = %request.id,
            employee_id = %request.employee_id,
            days = request.duration_days,
            "leave cancelled"
        );
        Ok(())
    }

    /// Loads one leave request.
    pub async fn get_request(&self, request_id: LeaveRequestId) -> Result<LeaveRequest, LeaveError> {
        self.load_request(request_id).await
    }

    /// Lists leave requests matching `filter`, newest first.
    pub async fn list_requests(&self, filter: &RequestFilter) -> Result<Vec<LeaveRequest>, LeaveError> {
        let mut requests: Vec<_> = self
            .requests
            .list_requests()
            .await?
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect();
        requests.sort_by(|a, b| (b.submitted_at, b.id).cmp(&(a.submitted_at, a.id)));
        Ok(requests)
    }

    /// Leave requests waiting on `role`, oldest first.
    pub async fn pending_for(&self, role: ApproverRole) -> Result<Vec<LeaveRequest>, LeaveError> {
        let mut requests: Vec<_> = self
            .requests
            .list_requests()
            .await?
            .into_iter()
            .filter(|r| r.status().awaiting() == Some(role))
            .collect();
        requests.sort_by_key(|r| (r.submitted_at, r.id));
        Ok(requests)
    }

    // ------------------------------------------------------------------
    // Cancellations
    // ------------------------------------------------------------------

    /// Loads one cancellation request.
    pub async fn get_cancellation(
        &self,
        cancellation_id: CancellationId,
    ) -> Result<CancellationRequest, LeaveError> {
        self.requests
            .load_cancellation(cancellation_id)
            .await?
            .ok_or(LeaveError::CancellationNotFound(cancellation_id))
    }

    /// Lists cancellations, newest first, optionally for one leave request.
    pub async fn list_cancellations(
        &self,
        request_id: Option<LeaveRequestId>,
    ) -> Result<Vec<CancellationRequest>, LeaveError> {
        let mut cancellations: Vec<_> = self
            .requests
            .list_cancellations()
            .await?
            .into_iter()
            .filter(|c| request_id.is_none_or(|id| id == c.leave_request_id))
            .collect();
        cancellations.sort_by(|a, b| (b.requested_at, b.id).cmp(&(a.requested_at, a.id)));
        Ok(cancellations)
    }

    /// Cancellation requests waiting on `role`, oldest first.
    pub async fn pending_cancellations_for(
        &self,
        role: ApproverRole,
    ) -> Result<Vec<CancellationRequest>, LeaveError> {
        let mut cancellations: Vec<_> = self
            .requests
            .list_cancellations()
            .await?
            .into_iter()
            .filter(|c| c.status().awaiting() == Some(role))
            .collect();
        cancellations.sort_by_key(|c| (c.requested_at, c.id));
        Ok(cancellations)
    }

    // ------------------------------------------------------------------
    // Staff directory
    // ------------------------------------------------------------------

    /// Registers a staff member and seeds their ledger row.
    ///
    /// A duplicate id leaves both directory and ledger untouched.
    pub async fn register_staff(&self, new_staff: NewStaff) -> Result<StaffMember, LeaveError> {
        let name = new_staff.name.trim();
        if name.is_empty() {
            return Err(LeaveError::Validation("name is required".to_string()));
        }
        if self.staff.load_staff(&new_staff.employee_id).await?.is_some() {
            return Err(LeaveError::Duplicate(new_staff.employee_id));
        }
        let security_question = new_staff
            .security_question
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty());
        let security_answer = new_staff
            .security_answer
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty());
        if security_question.is_some() != security_answer.is_some() {
            return Err(LeaveError::Validation(
                "security question and answer must be given together".to_string(),
            ));
        }

        let password_hash = auth::hash_password(&new_staff.password)?;
        let security_answer_hash = security_answer.map(auth::hash_security_answer).transpose()?;

        let member = StaffMember {
            employee_id: new_staff.employee_id,
            name: name.to_string(),
            designation: new_staff.designation.trim().to_string(),
            role: new_staff.role,
            department: new_staff.department.trim().to_string(),
            date_of_joining: new_staff.date_of_joining,
            contact_info: new_staff.contact_info,
            password_hash,
            security_question: security_question.map(str::to_string),
            security_answer_hash,
            created_at: Utc::now(),
        };
        let allotments = new_staff
            .allotments
            .unwrap_or_else(|| self.default_allotments.clone());

        self.ledger
            .create_employee(&member.employee_id, allotments)
            .await?;
        if let Err(err) = self.staff.save_staff(&member).await {
            warn!(employee_id = %member.employee_id, error = %err, "saving staff failed, removing ledger row");
            self.ledger.remove_employee(&member.employee_id).await?;
            return Err(err.into());
        }

        info!(employee_id = %member.employee_id, role = %member.role, "staff registered");
        Ok(member)
    }

    /// Checks a login.
    ///
    /// Unknown ids and wrong passwords fail the same way.
    pub async fn authenticate(&self, employee_id: &str, password: &str) -> Result<StaffMember, LeaveError> {
        let Ok(employee_id) = EmployeeId::parse(employee_id) else {
            auth::verify_dummy(password);
            return Err(LeaveError::Unauthorized);
        };
        let Some(member) = self.staff.load_staff(&employee_id).await? else {
            auth::verify_dummy(password);
            debug!(employee_id = %employee_id, "login for unknown employee");
            return Err(LeaveError::Unauthorized);
        };

        match auth::verify_password(password, &member.password_hash) {
            Ok(true) => Ok(member),
            Ok(false) => Err(LeaveError::Unauthorized),
            Err(err) => {
                warn!(employee_id = %employee_id, error = %err, "stored password hash unusable");
                Err(LeaveError::Unauthorized)
            }
        }
    }

    /// The recovery question of an account, if one was set.
    ///
    /// # Errors
    /// * `LeaveError::EmployeeNotFound` for an unknown id
    pub async fn security_question(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Option<String>, LeaveError> {
        Ok(self.get_staff(employee_id).await?.security_question)
    }

    /// Replaces a forgotten password after checking the security answer.
    ///
    /// Unknown ids, accounts without a question and wrong answers all fail
    /// with `LeaveError::Unauthorized`.
    pub async fn reset_password(
        &self,
        employee_id: &str,
        answer: &str,
        new_password: &str,
    ) -> Result<(), LeaveError> {
        let member = match EmployeeId::parse(employee_id) {
            Ok(id) => self.staff.load_staff(&id).await?,
            Err(_) => None,
        };
        let Some(mut member) = member else {
            auth::verify_dummy(answer);
            return Err(LeaveError::Unauthorized);
        };
        let Some(answer_hash) = member.security_answer_hash.as_deref() else {
            auth::verify_dummy(answer);
            return Err(LeaveError::Unauthorized);
        };

        match auth::verify_security_answer(answer, answer_hash) {
            Ok(true) => {}
            Ok(false) => return Err(LeaveError::Unauthorized),
            Err(err) => {
                warn!(employee_id = %member.employee_id, error = %err, "stored answer hash unusable");
                return Err(LeaveError::Unauthorized);
            }
        }

        member.password_hash = auth::hash_password(new_password)?;
        self.staff.save_staff(&member).await?;

        info!(employee_id = %member.employee_id, "password reset");
        Ok(())
    }

    /// Loads one staff member.
    pub async fn get_staff(&self, employee_id: &EmployeeId) -> Result<StaffMember, LeaveError> {
        self.staff
            .load_staff(employee_id)
            .await?
            .ok_or_else(|| LeaveError::EmployeeNotFound(employee_id.clone()))
    }

    /// Every staff member, ordered by employee id, optionally one role only.
    pub async fn list_staff(&self, role: Option<StaffRole>) -> Result<Vec<StaffMember>, LeaveError> {
        let mut staff: Vec<_> = self
            .staff
            .list_staff()
            .await?
            .into_iter()
            .filter(|m| role.is_none_or(|role| role == m.role))
            .collect();
        staff.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        Ok(staff)
    }

    // ------------------------------------------------------------------
    // Ledger and export
    // ------------------------------------------------------------------

    /// Balance record for one employee.
    pub async fn balance(&self, employee_id: &EmployeeId) -> Result<LeaveBalanceRecord, LeaveError> {
        self.ledger.balance(employee_id).await
    }

    /// The balance ledger.
    #[must_use]
    pub fn ledger(&self) -> &BalanceLedger {
        &self.ledger
    }

    /// Rows for the spreadsheet export.
    pub async fn export_snapshot(&self) -> Result<ExportSnapshot, LeaveError> {
        let staff = self.staff.list_staff().await?;
        let ledgers = self.ledger.all().await?;
        let requests = self.requests.list_requests().await?;
        Ok(export::snapshot(&staff, &ledgers, &requests, Utc::now()))
    }

    async fn load_request(&self, request_id: LeaveRequestId) -> Result<LeaveRequest, LeaveError> {
        self.requests
            .load_request(request_id)
            .await?
            .ok_or(LeaveError::RequestNotFound(request_id))
    }
}
