//! Staff directory records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use leaveflow_shared::StaffInfo;
use leaveflow_shared::config::SeedAccount;
use leaveflow_shared::types::EmployeeId;

use crate::auth::StaffRole;
use crate::leave::LeaveError;
use crate::ledger::Allotments;

/// A person who can log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    /// Employee code; also the login name.
    pub employee_id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Job title.
    pub designation: String,
    /// Directory role.
    pub role: StaffRole,
    /// Department.
    pub department: String,
    /// Joining date, when known.
    pub date_of_joining: Option<NaiveDate>,
    /// Phone or email.
    pub contact_info: Option<String>,
    /// Argon2id PHC string. API responses use [`StaffInfo`] or their own
    /// views, never this struct.
    pub password_hash: String,
    /// Question shown when the password is forgotten.
    pub security_question: Option<String>,
    /// Argon2id hash of the normalized answer.
    pub security_answer_hash: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl StaffMember {
    /// Public view returned after login.
    #[must_use]
    pub fn info(&self) -> StaffInfo {
        StaffInfo {
            employee_id: self.employee_id.clone(),
            name: self.name.clone(),
            designation: self.designation.clone(),
            role: self.role.as_str().to_string(),
        }
    }
}

/// Input for registering a staff member.
#[derive(Debug, Clone)]
pub struct NewStaff {
    /// Employee code.
    pub employee_id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Job title.
    pub designation: String,
    /// Directory role.
    pub role: StaffRole,
    /// Department.
    pub department: String,
    /// Joining date.
    pub date_of_joining: Option<NaiveDate>,
    /// Phone or email.
    pub contact_info: Option<String>,
    /// Plaintext password; hashed before storage.
    pub password: String,
    /// Recovery question; requires `security_answer`.
    pub security_question: Option<String>,
    /// Plaintext recovery answer; hashed before storage.
    pub security_answer: Option<String>,
    /// Per-type allotments; `None` uses the configured policy.
    pub allotments: Option<Allotments>,
}

impl NewStaff {
    /// Converts a configured seed account.
    ///
    /// # Errors
    /// * `LeaveError::Validation` for a malformed employee id or unknown role
    pub fn from_seed(seed: &SeedAccount) -> Result<Self, LeaveError> {
        let employee_id = EmployeeId::parse(&seed.employee_id)
            .map_err(|e| LeaveError::Validation(format!("seed {}: {e}", seed.employee_id)))?;
        let role = StaffRole::parse(&seed.role).ok_or_else(|| {
            LeaveError::Validation(format!("seed {}: unknown role {}", seed.employee_id, seed.role))
        })?;
        Ok(Self {
            employee_id,
            name: seed.name.clone(),
            designation: seed.designation.clone(),
            role,
            department: seed.department.clone(),
            date_of_joining: None,
            contact_info: None,
            password: seed.password.clone(),
            security_question: seed.security_question.clone(),
            security_answer: seed.security_answer.clone(),
            allotments: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(role: &str) -> SeedAccount {
        SeedAccount {
            employee_id: "HR001".to_string(),
            name: "HR Manager".to_string(),
            designation: "HR".to_string(),
            role: role.to_string(),
            password: "hr@123".to_string(),
            department: "Human Resources".to_string(),
            security_question: Some("What is your mother's maiden name?".to_string()),
            security_answer: Some("Smith".to_string()),
        }
    }

    #[test]
    fn test_from_seed() {
        let staff = NewStaff::from_seed(&seed("HR")).unwrap();
        assert_eq!(staff.employee_id.as_str(), "HR001");
        assert_eq!(staff.role, StaffRole::Hr);
        assert!(staff.allotments.is_none());
        assert_eq!(staff.security_answer.as_deref(), Some("Smith"));
    }

    #[test]
    fn test_stored_record_keeps_secrets() {
        let member = StaffMember {
            employee_id: EmployeeId::parse("E001").unwrap(),
            name: "Asha".to_string(),
            designation: "Engineer".to_string(),
            role: StaffRole::Employee,
            department: "Operations".to_string(),
            date_of_joining: None,
            contact_info: None,
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            security_question: Some("First school?".to_string()),
            security_answer_hash: Some("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$YW5z".to_string()),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&member).unwrap();
        let restored: StaffMember = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, member);
    }

    #[test]
    fn test_from_seed_unknown_role() {
        let result = NewStaff::from_seed(&seed("Chairman"));
        assert!(matches!(result, Err(LeaveError::Validation(_))));
    }
}
