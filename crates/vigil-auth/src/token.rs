//! Signed, time-bounded identity tokens (HS256 JWT).
//!
//! The token payload is self-contained: subject id, display identity, and
//! the full authority list (one entry per capability string plus the
//! synthesized `ROLE_<ROLE_UPPER>` authority). Validation needs only the
//! signing key — there is no server-side session to look up.

use chrono::{Duration, Utc};
use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
  errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vigil_core::identity::Identity;

use crate::error::{AuthError, Result};

// ─── Claims ──────────────────────────────────────────────────────────────────

/// The claims carried in an issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  /// Subject id of the authenticated identity.
  pub sub:         Uuid,
  pub name:        String,
  pub email:       String,
  pub badge:       Option<String>,
  /// Capability strings plus the `ROLE_<ROLE_UPPER>` authority.
  pub authorities: Vec<String>,
  /// Issued-at, seconds since the epoch.
  pub iat:         i64,
  /// Expiry, seconds since the epoch.
  pub exp:         i64,
}

impl Claims {
  /// OR-semantics authority check: true when the claims carry at least one
  /// of `required`. Membership is exact-match; there is no hierarchy.
  pub fn has_any(&self, required: &[&str]) -> bool {
    required.iter().any(|r| self.authorities.iter().any(|a| a == r))
  }
}

// ─── Keys ────────────────────────────────────────────────────────────────────

/// The process-wide signing key pair plus token lifetime. Built once at
/// startup from configuration; read-only afterwards.
pub struct TokenKeys {
  encoding: EncodingKey,
  decoding: DecodingKey,
  ttl:      Duration,
}

impl TokenKeys {
  pub fn from_secret(secret: &[u8], ttl_seconds: i64) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      ttl:      Duration::seconds(ttl_seconds),
    }
  }

  /// Issue a token for `identity`.
  pub fn issue(&self, identity: &Identity) -> Result<String> {
    let mut authorities: Vec<String> =
      identity.permissions.iter().cloned().collect();
    authorities.push(identity.role.authority());

    let now = Utc::now();
    let claims = Claims {
      sub:         identity.identity_id,
      name:        identity.name.clone(),
      email:       identity.email.clone(),
      badge:       identity.badge_number.clone(),
      authorities,
      iat:         now.timestamp(),
      exp:         (now + self.ttl).timestamp(),
    };

    encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
      .map_err(|e| AuthError::Signing(e.to_string()))
  }

  /// Validate a presented token and return its claims.
  ///
  /// Expiry is reported as [`AuthError::ExpiredToken`]; every other defect
  /// (bad signature, malformed structure, wrong algorithm) collapses into
  /// [`AuthError::InvalidToken`].
  pub fn validate(&self, token: &str) -> Result<Claims> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &self.decoding, &validation)
      .map(|data| data.claims)
      .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
      })
  }
}

#[cfg(test)]
mod tests {
  use vigil_core::identity::Role;

  use super::*;

  fn keys() -> TokenKeys {
    TokenKeys::from_secret(b"test-signing-secret", 3600)
  }

  fn officer() -> Identity {
    Identity::new("Pat Lane", "pat@force.example", "$argon2id$...", Role::Officer)
  }

  #[test]
  fn issue_and_validate_round_trip() {
    let keys = keys();
    let identity = officer();

    let token = keys.issue(&identity).unwrap();
    let claims = keys.validate(&token).unwrap();

    assert_eq!(claims.sub, identity.identity_id);
    assert_eq!(claims.email, "pat@force.example");
    assert_eq!(claims.badge, identity.badge_number);
    assert!(claims.authorities.contains(&"ROLE_OFFICER".to_string()));
    assert!(claims.authorities.contains(&"case:write".to_string()));
    assert!(!claims.authorities.contains(&"user:write".to_string()));
    assert!(claims.exp > claims.iat);
  }

  #[test]
  fn expired_token_is_classified_as_expired() {
    // Issue with a lifetime well past the default validation leeway.
    let keys = TokenKeys::from_secret(b"test-signing-secret", -3600);
    let token = keys.issue(&officer()).unwrap();
    assert!(matches!(keys.validate(&token), Err(AuthError::ExpiredToken)));
  }

  #[test]
  fn wrong_key_is_invalid_not_expired() {
    let token = keys().issue(&officer()).unwrap();
    let other = TokenKeys::from_secret(b"a-different-secret", 3600);
    assert!(matches!(other.validate(&token), Err(AuthError::InvalidToken)));
  }

  #[test]
  fn tampered_token_is_invalid() {
    let keys = keys();
    let mut token = keys.issue(&officer()).unwrap();
    token.push('x');
    assert!(matches!(keys.validate(&token), Err(AuthError::InvalidToken)));
    assert!(matches!(keys.validate("not.a.jwt"), Err(AuthError::InvalidToken)));
  }

  #[test]
  fn has_any_is_exact_match_or_semantics() {
    let keys = keys();
    let token = keys.issue(&officer()).unwrap();
    let claims = keys.validate(&token).unwrap();

    assert!(claims.has_any(&["ROLE_ADMIN", "ROLE_OFFICER"]));
    assert!(claims.has_any(&["case:write"]));
    assert!(!claims.has_any(&["ROLE_ADMIN", "user:write"]));
    // Prefix of a capability is not a match.
    assert!(!claims.has_any(&["case"]));
  }
}
