//! Authentication types for JWT and login.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::EmployeeId;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (employee code).
    pub sub: EmployeeId,
    /// Staff role (`employee`, `site_incharge`, `hr`, `sbu_head`, `admin`).
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a staff member.
    #[must_use]
    pub fn new(employee_id: EmployeeId, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: employee_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the employee code from claims.
    #[must_use]
    pub const fn employee_id(&self) -> &EmployeeId {
        &self.sub
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Employee code.
    pub employee_id: String,
    /// Password.
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated staff member.
    pub staff: StaffInfo,
    /// Access token.
    pub access_token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

/// Staff info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct StaffInfo {
    /// Employee code.
    pub employee_id: EmployeeId,
    /// Full name.
    pub name: String,
    /// Job title.
    pub designation: String,
    /// Staff role.
    pub role: String,
}
