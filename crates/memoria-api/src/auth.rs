//! Password hashing and verification with argon2 PHC strings.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::error::ApiError;

/// Hash a password into an argon2 PHC string (`$argon2id$v=19$…`).
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map_err(|e| ApiError::BadRequest(format!("unhashable password: {e}")))?;
  Ok(hash.to_string())
}

/// Check a candidate password against a stored PHC string. Any parse or
/// verification failure reads as a mismatch.
pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}
