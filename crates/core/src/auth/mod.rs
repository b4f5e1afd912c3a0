//! Authentication and staff roles.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - Security answers for password recovery
//! - Staff role definitions and what each role may do

mod password;

pub use password::{
    MIN_PASSWORD_LEN, PasswordError, hash_password, hash_security_answer, verify_password,
    verify_security_answer,
};
pub(crate) use password::verify_dummy;

use serde::{Deserialize, Serialize};

use crate::leave::ApproverRole;

/// Role of a person in the staff directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Submits leave for themselves.
    Employee,
    /// First approval stage.
    SiteIncharge,
    /// Second approval stage.
    Hr,
    /// Final approval stage.
    SbuHead,
    /// Manages staff; may act for any approval stage.
    Admin,
}

impl StaffRole {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::SiteIncharge => "site_incharge",
            Self::Hr => "hr",
            Self::SbuHead => "sbu_head",
            Self::Admin => "admin",
        }
    }

    /// Parses a role, accepting the snake_case tag or the display name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "employee" => Some(Self::Employee),
            "site_incharge" | "siteincharge" => Some(Self::SiteIncharge),
            "hr" => Some(Self::Hr),
            "sbu_head" | "sbuhead" => Some(Self::SbuHead),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// The approval stage this role owns, if any.
    #[must_use]
    pub const fn approver_role(&self) -> Option<ApproverRole> {
        match self {
            Self::SiteIncharge => Some(ApproverRole::SiteIncharge),
            Self::Hr => Some(ApproverRole::Hr),
            Self::SbuHead => Some(ApproverRole::SbuHead),
            Self::Employee | Self::Admin => None,
        }
    }

    /// Returns true if this role may record decisions for `stage`.
    #[must_use]
    pub fn can_decide_as(&self, stage: ApproverRole) -> bool {
        matches!(self, Self::Admin) || self.approver_role() == Some(stage)
    }

    /// Returns true if this role can register staff.
    #[must_use]
    pub const fn can_manage_staff(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns true if this role can read every employee's records.
    #[must_use]
    pub const fn can_view_all(&self) -> bool {
        !matches!(self, Self::Employee)
    }

    /// Returns true if this role can download the spreadsheet export.
    #[must_use]
    pub const fn can_export(&self) -> bool {
        matches!(self, Self::Admin | Self::Hr | Self::SbuHead)
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("employee", StaffRole::Employee)]
    #[case("Site Incharge", StaffRole::SiteIncharge)]
    #[case("site_incharge", StaffRole::SiteIncharge)]
    #[case("HR", StaffRole::Hr)]
    #[case("SBU Head", StaffRole::SbuHead)]
    #[case("sbu-head", StaffRole::SbuHead)]
    #[case("Admin", StaffRole::Admin)]
    fn test_parse(#[case] raw: &str, #[case] expected: StaffRole) {
        assert_eq!(StaffRole::parse(raw), Some(expected));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(StaffRole::parse("manager"), None);
    }

    #[test]
    fn test_decision_rights() {
        assert!(StaffRole::SiteIncharge.can_decide_as(ApproverRole::SiteIncharge));
        assert!(!StaffRole::SiteIncharge.can_decide_as(ApproverRole::Hr));
        assert!(StaffRole::Hr.can_decide_as(ApproverRole::Hr));
        assert!(StaffRole::SbuHead.can_decide_as(ApproverRole::SbuHead));
        assert!(!StaffRole::Employee.can_decide_as(ApproverRole::SiteIncharge));
        for stage in ApproverRole::ORDER {
            assert!(StaffRole::Admin.can_decide_as(stage));
        }
    }

    #[test]
    fn test_role_permissions() {
        assert!(StaffRole::Admin.can_manage_staff());
        assert!(!StaffRole::Hr.can_manage_staff());

        assert!(StaffRole::Admin.can_export());
        assert!(StaffRole::Hr.can_export());
        assert!(StaffRole::SbuHead.can_export());
        assert!(!StaffRole::SiteIncharge.can_export());
        assert!(!StaffRole::Employee.can_export());

        assert!(!StaffRole::Employee.can_view_all());
        assert!(StaffRole::SiteIncharge.can_view_all());
    }
}
