//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `CancellationId` where a
//! `LeaveRequestId` is expected.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(LeaveRequestId, "Unique identifier for a leave request.");
typed_id!(
    CancellationId,
    "Unique identifier for a cancellation request."
);

/// Maximum length of an employee code.
pub const EMPLOYEE_ID_MAX_LEN: usize = 32;

/// Rejected employee code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmployeeIdError {
    /// The code is empty after trimming.
    #[error("employee id must not be empty")]
    Empty,
    /// The code is longer than [`EMPLOYEE_ID_MAX_LEN`].
    #[error("employee id must be at most {EMPLOYEE_ID_MAX_LEN} characters")]
    TooLong,
    /// The code contains something other than ASCII letters, digits, `-` or `_`.
    #[error("employee id may only contain letters, digits, '-' and '_'")]
    InvalidCharacter,
}

/// Human-assigned employee code such as `E001`, `HR001` or `99508`.
///
/// Codes are case-sensitive and stored exactly as given (after trimming).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmployeeId(String);

impl EmployeeId {
    /// Parses and validates an employee code.
    pub fn parse(raw: &str) -> Result<Self, EmployeeIdError> {
        let code = raw.trim();
        if code.is_empty() {
            return Err(EmployeeIdError::Empty);
        }
        if code.len() > EMPLOYEE_ID_MAX_LEN {
            return Err(EmployeeIdError::TooLong);
        }
        if !code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(EmployeeIdError::InvalidCharacter);
        }
        Ok(Self(code.to_string()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmployeeId {
    type Error = EmployeeIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmployeeId> for String {
    fn from(id: EmployeeId) -> Self {
        id.0
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for EmployeeId {
    type Err = EmployeeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
