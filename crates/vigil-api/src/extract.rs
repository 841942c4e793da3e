//! Bearer-token extractor and the capability gate.
//!
//! Every protected handler takes an [`AuthClaims`] argument; extraction
//! validates the presented token against the process-wide signing key. A
//! missing, malformed, expired, or forged token is rejected with 401 before
//! the handler body runs. Authority checks (403) are the handler's first
//! statement, via [`AuthClaims::require_any`].

use axum::http::{HeaderMap, header, request::Parts};
use vigil_auth::Claims;

use crate::{ApiError, AppState, VigilStore};

/// The validated claims of the calling identity.
pub struct AuthClaims(pub Claims);

impl AuthClaims {
  /// OR-semantics capability gate: succeeds when the caller holds at least
  /// one of `required`, otherwise rejects with 403.
  pub fn require_any(&self, required: &[&str]) -> Result<(), ApiError> {
    if self.0.has_any(required) {
      Ok(())
    } else {
      Err(ApiError::Forbidden)
    }
  }
}

/// Pull the token out of an `Authorization: Bearer …` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
}

impl<S: VigilStore> axum::extract::FromRequestParts<AppState<S>> for AuthClaims {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)
      .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;
    let claims = state.keys.validate(token)?;
    Ok(AuthClaims(claims))
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;
  use uuid::Uuid;

  use super::*;

  fn claims(authorities: &[&str]) -> AuthClaims {
    AuthClaims(Claims {
      sub:         Uuid::new_v4(),
      name:        "Pat Lane".into(),
      email:       "pat@force.example".into(),
      badge:       Some("SC12345".into()),
      authorities: authorities.iter().map(|a| a.to_string()).collect(),
      iat:         0,
      exp:         i64::MAX,
    })
  }

  #[test]
  fn bearer_token_requires_the_scheme() {
    let mut headers = HeaderMap::new();
    assert_eq!(bearer_token(&headers), None);

    headers.insert(
      header::AUTHORIZATION,
      HeaderValue::from_static("Basic dXNlcjpwdw=="),
    );
    assert_eq!(bearer_token(&headers), None);

    headers.insert(
      header::AUTHORIZATION,
      HeaderValue::from_static("Bearer abc.def.ghi"),
    );
    assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
  }

  #[test]
  fn require_any_is_or_semantics() {
    let officer = claims(&["case:read", "case:write", "ROLE_OFFICER"]);
    assert!(officer.require_any(&["case:read"]).is_ok());
    assert!(officer.require_any(&["ROLE_ADMIN", "ROLE_OFFICER"]).is_ok());
    assert!(matches!(
      officer.require_any(&["ROLE_ADMIN", "user:write"]),
      Err(ApiError::Forbidden)
    ));
  }
}
