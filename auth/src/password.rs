//! Password hashing using Argon2id.

use crate::AuthError;
use argon2::{
    Argon2, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

/// Hash a plaintext password into a PHC-format string.
pub fn hash(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AuthError::Crypto(format!("hashing failed: {err}")))?
        .to_string())
}

/// Verify a plaintext password against a PHC-format hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only if the stored hash is
/// malformed.
pub fn verify(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|err| AuthError::Crypto(format!("invalid hash format: {err}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(AuthError::Crypto(format!("verify error: {err}"))),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn correct_password_matches() {
        let hash = hash("hunter2").unwrap();
        assert!(verify("hunter2", &hash).unwrap());
    }

    #[test]
    fn wrong_password_does_not_match() {
        let hash = hash("hunter2").unwrap();
        assert!(!verify("wrong", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify("pw", "not-a-hash").is_err());
    }
}
