//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/signin` | Body: `{"email":…, "password":…}` |
//! | `POST` | `/auth/signup` | Role defaults to `user` |
//! | `GET`  | `/auth/user` | The calling identity |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vigil_core::identity::{Identity, Role};

use crate::{
  ApiError, AppState, VigilStore, extract::AuthClaims, users::IdentityResponse,
};

// ─── Sign in ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SigninBody {
  pub email:    String,
  pub password: String,
}

/// The signed token plus the display fields a client renders immediately.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
  pub token:       String,
  pub id:          Uuid,
  pub name:        String,
  pub email:       String,
  pub badge:       Option<String>,
  pub authorities: Vec<String>,
}

impl TokenResponse {
  fn new(token: String, identity: Identity) -> Self {
    let mut authorities: Vec<String> =
      identity.permissions.iter().cloned().collect();
    authorities.push(identity.role.authority());
    Self {
      token,
      id: identity.identity_id,
      name: identity.name,
      email: identity.email,
      badge: identity.badge_number,
      authorities,
    }
  }
}

/// `POST /auth/signin`
pub async fn signin<S: VigilStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<SigninBody>,
) -> Result<Json<TokenResponse>, ApiError> {
  let identity =
    vigil_auth::authenticate(&*state.store, &body.email, &body.password)
      .await?;
  let token = state.keys.issue(&identity)?;
  Ok(Json(TokenResponse::new(token, identity)))
}

// ─── Sign up ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignupBody {
  pub name:     String,
  pub email:    String,
  pub password: String,
  /// Role name; defaults to `user` when absent.
  pub role:     Option<String>,
}

/// `POST /auth/signup` — 409 when the email is already taken.
pub async fn signup<S: VigilStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<SignupBody>,
) -> Result<impl IntoResponse, ApiError> {
  let role = match &body.role {
    Some(name) => {
      Role::parse(name).map_err(|e| ApiError::BadRequest(e.to_string()))?
    }
    None => Role::User,
  };

  let identity = vigil_auth::register(
    &*state.store,
    &body.name,
    &body.email,
    &body.password,
    role,
  )
  .await?;

  tracing::info!(id = %identity.identity_id, role = role.as_str(), "registered identity");
  Ok((StatusCode::CREATED, Json(IdentityResponse::from(identity))))
}

// ─── Current identity ─────────────────────────────────────────────────────────

/// `GET /auth/user` — resolves the token's subject against the store, so a
/// deleted identity reads as 404 even with a still-valid token.
pub async fn current_user<S: VigilStore>(
  State(state): State<AppState<S>>,
  claims: AuthClaims,
) -> Result<Json<IdentityResponse>, ApiError> {
  let id = claims.0.sub;
  let identity = state
    .store
    .find_identity(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("identity {id} not found")))?;
  Ok(Json(identity.into()))
}
