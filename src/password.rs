//! Credential hashing and verification using Argon2.
//!
//! Uses the argon2id variant with default parameters. Stored values are
//! PHC-formatted strings carrying salt and parameters; the raw credential is
//! never persisted.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::errors::CoreError;

/// Hash a raw credential, returning the PHC-formatted string.
pub fn hash_credential(raw: &str) -> Result<String, CoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| CoreError::other(format!("failed to hash credential: {err}")))
}

/// Verify a raw credential against a stored PHC hash.
pub fn verify_credential(raw: &str, phc: &str) -> Result<bool, CoreError> {
    let parsed = PasswordHash::new(phc)
        .map_err(|err| CoreError::other(format!("invalid credential hash format: {err}")))?;
    Ok(Argon2::default().verify_password(raw.as_bytes(), &parsed).is_ok())
}

/// Burn one hashing round. Called on the unknown-email path so that lookup
/// misses cost roughly the same as a failed verification and the two failure
/// modes stay indistinguishable from outside.
pub fn burn_verification(raw: &str) {
    let _ = hash_credential(raw);
}
