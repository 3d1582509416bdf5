//! Password hashing and verification.
//!
//! Stored credentials are Argon2id PHC strings. Plaintext passwords only
//! live in caller-owned buffers (`Zeroizing<String>` where they are kept).
//!
//! # Security
//!
//! - Argon2id (memory-hard, resistant to GPU/ASIC attacks)
//! - Random salt per hash from a ChaCha20 CSPRNG seeded with OS entropy
//! - Verification is delegated to `argon2`, which compares in constant time

use argon2::{
    password_hash::{PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

use super::user::PasswordHash;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 4;

/// Errors during credential hashing/verification.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Stored credential is not a valid PHC string")]
    InvalidFormat,
}

/// Argon2id with 19 MiB memory, 2 iterations, 1 lane.
fn hasher() -> Result<Argon2<'static>, CredentialError> {
    let params = Params::new(19456, 2, 1, None)
        .map_err(|e| CredentialError::Hashing(format!("Invalid Argon2 params: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Generate a random salt for Argon2id.
#[must_use]
pub fn generate_salt() -> SaltString {
    let mut rng = ChaCha20Rng::from_entropy();
    SaltString::generate(&mut rng)
}

/// Whether `password` meets the minimum length.
#[must_use]
pub fn meets_min_length(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Hash a plaintext password into a PHC string.
///
/// # Errors
/// Returns error if Argon2 rejects the parameters or input.
pub fn hash_password(password: &str) -> Result<PasswordHash, CredentialError> {
    let salt = generate_salt();
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CredentialError::Hashing(e.to_string()))?;
    Ok(PasswordHash::from_phc(hash.to_string()))
}

/// Check a plaintext password against a stored hash.
///
/// Returns `Ok(false)` on mismatch.
///
/// # Errors
/// Returns `CredentialError::InvalidFormat` if the stored hash cannot be parsed.
pub fn verify_password(password: &str, stored: &PasswordHash) -> Result<bool, CredentialError> {
    let parsed = PhcString::new(stored.as_str()).map_err(|_| CredentialError::InvalidFormat)?;

    // Parameters come from the PHC string itself, so older hashes still verify.
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CredentialError::Hashing(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("correct-horse").expect("Hashing should succeed");

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(verify_password("correct-horse", &hash).expect("Should verify"));
        assert!(!verify_password("wrong-horse", &hash).expect("Should verify"));
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let a = hash_password("same").expect("Hashing should succeed");
        let b = hash_password("same").expect("Hashing should succeed");
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_is_invalid_format() {
        let garbage = PasswordHash::from_phc("not-a-phc-string");
        assert!(matches!(
            verify_password("anything", &garbage),
            Err(CredentialError::InvalidFormat)
        ));
    }

    #[test]
    fn test_min_length_counts_characters() {
        assert!(!meets_min_length("abc"));
        assert!(meets_min_length("abcd"));
        // Four characters, more than four bytes.
        assert!(meets_min_length("ññññ"));
    }
}
