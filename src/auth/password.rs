//! Password hashing
//!
//! Argon2 with a fresh random salt per hash. Only the PHC hash string is
//! ever stored; verification re-derives from the stored parameters.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AppError;

/// Hash a plaintext password with a fresh random salt
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {e}")))?
        .to_string();
    Ok(hash)
}

/// Verify a plaintext password against a stored hash
///
/// # Returns
/// `Ok(true)` on match, `Ok(false)` on mismatch
pub fn verify_password(plain: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to parse password hash: {e}")))?;

    let argon2 = Argon2::default();
    Ok(argon2.verify_password(plain.as_bytes(), &parsed_hash).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("123mypw").unwrap();

        assert!(verify_password("123mypw", &hash).unwrap());
        assert!(!verify_password("not the pw", &hash).unwrap());
    }

    #[test]
    fn fresh_salt_per_hash() {
        let first = hash_password("123mypw").unwrap();
        let second = hash_password("123mypw").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(verify_password("pw", "not-a-phc-string").is_err());
    }
}
