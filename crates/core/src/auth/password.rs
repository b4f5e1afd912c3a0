//! Password hashing with Argon2id.

use std::sync::OnceLock;

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Shortest password accepted for a staff account.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Password is shorter than [`MIN_PASSWORD_LEN`].
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    TooShort,

    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format.
    #[error("invalid password hash format")]
    InvalidHash,
}

/// Hashes a password using Argon2id and returns the PHC string.
///
/// # Errors
///
/// Returns `PasswordError::TooShort` for passwords under the minimum length
/// and `PasswordError::HashError` if hashing fails.
///
/// # Example
///
/// ```
/// use leaveflow_core::auth::hash_password;
///
/// let hash = hash_password("site@123").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooShort);
    }
    hash_secret(password)
}

/// Hashes a security answer. Case and surrounding whitespace are ignored.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails.
pub fn hash_security_answer(answer: &str) -> Result<String, PasswordError> {
    hash_secret(&normalize_answer(answer))
}

/// Verifies a security answer against a hash from [`hash_security_answer`].
///
/// # Errors
///
/// Same as [`verify_password`].
pub fn verify_security_answer(answer: &str, hash: &str) -> Result<bool, PasswordError> {
    verify_password(&normalize_answer(answer), hash)
}

fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

fn hash_secret(secret: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against a stored PHC hash.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the hash format is invalid.
/// Returns `PasswordError::VerifyError` if verification fails unexpectedly.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

/// Burns one verification against a fixed hash.
///
/// Called for unknown employee ids so a failed login costs the same
/// whether or not the account exists.
pub(crate) fn verify_dummy(password: &str) {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    let dummy = DUMMY.get_or_init(|| hash_password("dummy-password").ok());
    if let Some(hash) = dummy {
        let _ = verify_password(password, hash);
    }
}
