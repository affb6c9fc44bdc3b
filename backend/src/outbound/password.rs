//! Password hashes shared by the identity adapters.
//!
//! Stored form is an Argon2id PHC string (`$argon2id$v=19$m=...$salt$hash`).

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

/// Hash `password` under a fresh random salt.
///
/// # Errors
///
/// Fails when Argon2 rejects its parameters or the generated salt.
pub(crate) fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// Check `password` against a value produced by [`hash_password`].
///
/// Malformed stored values never verify.
pub(crate) fn verify_password(stored: &str, password: &str) -> bool {
    PasswordHash::new(stored).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}
