use crate::error::AppError;
use bcrypt::{hash, verify};
use validator::ValidationError;

/// bcrypt only reads this many bytes of input; anything after would be ignored.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Validator hook for password fields: rejects input bcrypt would truncate.
pub fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        let mut error = ValidationError::new("password_too_long");
        error.message = Some(format!("must be at most {} bytes", MAX_PASSWORD_BYTES).into());
        return Err(error);
    }
    Ok(())
}

/// Hashes `password` with bcrypt at the given cost. The salt is random, so two calls
/// on the same input produce different strings.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::ValidationError(format!(
            "password: must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    hash(password, cost)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// Checks `password` against a stored bcrypt hash.
///
/// `Ok(false)` means a mismatch; `Err` means the stored hash itself is unusable.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}
