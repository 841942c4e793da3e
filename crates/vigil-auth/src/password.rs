//! argon2 credential hashing and verification.
//!
//! Stored hashes are PHC strings (`$argon2id$v=19$…`). Verification is
//! constant-time inside the argon2 implementation; the plaintext credential
//! never leaves this module's stack frames.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::error::{AuthError, Result};

/// Hash a plaintext credential with a fresh random salt.
pub fn hash(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verify a plaintext credential against a stored PHC string.
/// An unparseable stored hash verifies as `false`, never as an error.
pub fn verify(password: &str, stored: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(stored) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_and_verify_round_trip() {
    let stored = hash("correct horse").unwrap();
    assert!(stored.starts_with("$argon2"));
    assert!(verify("correct horse", &stored));
    assert!(!verify("battery staple", &stored));
  }

  #[test]
  fn garbage_stored_hash_verifies_false() {
    assert!(!verify("anything", "not-a-phc-string"));
    assert!(!verify("anything", ""));
  }

  #[test]
  fn same_password_hashes_differently() {
    let a = hash("pw").unwrap();
    let b = hash("pw").unwrap();
    assert_ne!(a, b);
  }
}
