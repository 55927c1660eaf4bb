use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{AppError, Result};

/// Bytes of entropy in a generated password.
const GENERATED_PASSWORD_BYTES: usize = 6;

/// Hashes `password` into a self-describing PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Checks `attempt` against a stored hash. A malformed hash never matches.
pub fn authenticate(stored_hash: &str, attempt: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(attempt.as_bytes(), &parsed)
        .is_ok()
}

/// Generates a fresh random password and its hash.
pub fn reset_password() -> Result<(String, String)> {
    let mut bytes = [0u8; GENERATED_PASSWORD_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AppError::Randomness(e.to_string()))?;
    let password = BASE64.encode(bytes);
    let hash = hash_password(&password)?;
    Ok((password, hash))
}
