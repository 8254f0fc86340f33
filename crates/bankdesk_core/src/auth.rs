//! Password hashing and verification for manager/client accounts.
//!
//! # Responsibility
//! - Produce salted Argon2id PHC strings for storage.
//! - Verify submitted passwords against stored PHC strings.
//!
//! # Invariants
//! - Plaintext passwords are never persisted.
//! - Digest comparison is constant-time (delegated to `password-hash`).
//! - A missing account costs one verification too, so absent and present
//!   logins take comparable time.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use log::warn;
use once_cell::sync::Lazy;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AuthResult<T> = Result<T, AuthError>;

/// Hashing or verification backend failure. A wrong password is not an error here.
#[derive(Debug)]
pub enum AuthError {
    Hash(password_hash::Error),
    MalformedHash(password_hash::Error),
    Verify(password_hash::Error),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hash(err) => write!(f, "failed to hash password: {err}"),
            Self::MalformedHash(err) => write!(f, "stored password hash is malformed: {err}"),
            Self::Verify(err) => write!(f, "failed to verify password: {err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Hash(err) | Self::MalformedHash(err) | Self::Verify(err) => Some(err),
        }
    }
}

static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| hash_password("bankdesk-dummy").ok());

/// Hashes `password` with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(AuthError::Hash)?;
    Ok(hash.to_string())
}

/// Returns whether `password` matches the stored PHC string.
///
/// # Errors
/// - [`AuthError::MalformedHash`] when `stored` is not a PHC string.
/// - [`AuthError::Verify`] for backend failures other than a mismatch.
pub fn verify_password(password: &str, stored: &str) -> AuthResult<bool> {
    let parsed = PasswordHash::new(stored).map_err(AuthError::MalformedHash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(AuthError::Verify(err)),
    }
}

/// Spends one verification on a throwaway hash for logins that do not exist.
pub(crate) fn verify_against_dummy(password: &str) {
    match DUMMY_HASH.as_deref() {
        Some(hash) => {
            let _ = verify_password(password, hash);
        }
        None => warn!("event=auth_dummy module=auth status=skipped reason=hash_unavailable"),
    }
}
