//! Password hashing and verification
//!
//! Argon2id with a random per-password salt, stored as a PHC string.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

/// Minimum length for passwords set through account management
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a stored hash
///
/// A mismatch is `Ok(false)`; only an unparseable hash is an error.
///
/// # Errors
/// Returns an error if the stored hash is not a valid PHC string
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Spend one Argon2 evaluation on `password` where no stored hash exists
///
/// Always `false`. Lets a login for an unknown account cost the same as a
/// wrong password for a known one.
pub fn dummy_verify_password(password: &str) -> bool {
    let salt = SaltString::generate(&mut OsRng);
    let _ = Argon2::default().hash_password(password.as_bytes(), &salt);
    false
}

/// Validate a new admin password
///
/// Requires at least `MIN_PASSWORD_LENGTH` characters with at least one
/// letter and one digit. The bootstrap account is exempt; it is expected to
/// be changed after first login.
///
/// # Errors
/// Returns a validation error describing the first unmet rule
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }

    if !password.chars().any(char::is_alphabetic) {
        return Err(AppError::Validation(
            "Password must contain at least one letter".to_string(),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Password must contain at least one digit".to_string(),
        ));
    }

    Ok(())
}
