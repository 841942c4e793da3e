//! Handlers for `/users` endpoints — identity administration, admin only.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/users` | Paged |
//! | `GET`    | `/users/{id}` | 404 if not found |
//! | `PUT`    | `/users/{id}/role` | Body: `{"role":"officer"}` |
//! | `DELETE` | `/users/{id}` | Irreversible |

use std::collections::BTreeSet;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vigil_core::{
  identity::{Identity, Role},
  query::{Page, PageRequest, SortDirection},
};

use crate::{ApiError, AppState, VigilStore, extract::AuthClaims};

// ─── Response projection ──────────────────────────────────────────────────────

/// The outward-facing shape of an identity. The credential hash never
/// leaves the store layer through this projection.
#[derive(Debug, Serialize)]
pub struct IdentityResponse {
  pub id:           Uuid,
  pub name:         String,
  pub email:        String,
  pub role:         Role,
  pub badge_number: Option<String>,
  pub phone:        Option<String>,
  pub department:   Option<String>,
  pub avatar:       Option<String>,
  pub active:       bool,
  pub permissions:  BTreeSet<String>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

impl From<Identity> for IdentityResponse {
  fn from(identity: Identity) -> Self {
    Self {
      id:           identity.identity_id,
      name:         identity.name,
      email:        identity.email,
      role:         identity.role,
      badge_number: identity.badge_number,
      phone:        identity.phone,
      department:   identity.department,
      avatar:       identity.avatar,
      active:       identity.active,
      permissions:  identity.permissions,
      created_at:   identity.created_at,
      updated_at:   identity.updated_at,
    }
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub page:      Option<usize>,
  pub size:      Option<usize>,
  pub sort_by:   Option<String>,
  pub direction: Option<SortDirection>,
}

impl ListParams {
  fn page_request(&self) -> PageRequest {
    let defaults = PageRequest::default();
    PageRequest {
      page:      self.page.unwrap_or(defaults.page),
      size:      self.size.unwrap_or(defaults.size),
      sort_by:   self.sort_by.clone().unwrap_or(defaults.sort_by),
      direction: self.direction.unwrap_or(defaults.direction),
    }
  }
}

/// `GET /users`
pub async fn list<S: VigilStore>(
  State(state): State<AppState<S>>,
  claims: AuthClaims,
  Query(params): Query<ListParams>,
) -> Result<Json<Page<IdentityResponse>>, ApiError> {
  claims.require_any(&["ROLE_ADMIN"])?;

  let page = state
    .store
    .list_identities(&params.page_request())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(page.map(IdentityResponse::from)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/{id}`
pub async fn get_one<S: VigilStore>(
  State(state): State<AppState<S>>,
  claims: AuthClaims,
  Path(id): Path<Uuid>,
) -> Result<Json<IdentityResponse>, ApiError> {
  claims.require_any(&["ROLE_ADMIN"])?;

  let identity = state
    .store
    .find_identity(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("identity {id} not found")))?;
  Ok(Json(identity.into()))
}

// ─── Role change ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RoleBody {
  pub role: String,
}

/// `PUT /users/{id}/role` — re-derives the permission set; an existing badge
/// number is kept.
pub async fn change_role<S: VigilStore>(
  State(state): State<AppState<S>>,
  claims: AuthClaims,
  Path(id): Path<Uuid>,
  Json(body): Json<RoleBody>,
) -> Result<Json<IdentityResponse>, ApiError> {
  claims.require_any(&["ROLE_ADMIN"])?;

  let role = Role::parse(&body.role)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let identity = vigil_auth::change_role(&*state.store, id, role).await?;
  Ok(Json(identity.into()))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /users/{id}`
pub async fn delete<S: VigilStore>(
  State(state): State<AppState<S>>,
  claims: AuthClaims,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  claims.require_any(&["ROLE_ADMIN"])?;

  let deleted =
    state.store.delete_identity(id).await.map_err(ApiError::store)?;
  if deleted {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("identity {id} not found")))
  }
}
