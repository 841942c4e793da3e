//! Error types for `vigil-auth`.
//!
//! Authentication failures carry no credential material; messages name the
//! failure class only.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuthError {
  /// Unknown email or mismatched credential. Deliberately a single variant
  /// so callers cannot distinguish the two.
  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("account disabled")]
  AccountDisabled,

  #[error("invalid token")]
  InvalidToken,

  #[error("expired token")]
  ExpiredToken,

  #[error("email is already taken")]
  EmailTaken,

  #[error("identity not found: {0}")]
  IdentityNotFound(Uuid),

  #[error("credential hashing error: {0}")]
  Hash(String),

  #[error("token signing error: {0}")]
  Signing(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = AuthError> = std::result::Result<T, E>;
