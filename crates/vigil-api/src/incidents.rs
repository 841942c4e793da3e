//! Handlers for `/incidents` endpoints. Officer-or-admin territory apart
//! from the admin-only delete.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/incidents` | Optional `?status=active\|contained\|resolved` |
//! | `POST`   | `/incidents` | Status forced to `active` |
//! | `GET`    | `/incidents/{id}` | 404 if not found |
//! | `PUT`    | `/incidents/{id}` | Partial update |
//! | `POST`   | `/incidents/{id}/updates` | Appends to the response log |
//! | `DELETE` | `/incidents/{id}` | Admin only |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use vigil_core::{
  incident::{Incident, IncidentPatch, IncidentStatus, NewIncident},
  query::{Page, PageRequest, SortDirection},
};

use crate::{ApiError, AppState, VigilStore, extract::AuthClaims};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status:    Option<String>,
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

/// `GET /incidents`
pub async fn list<S: VigilStore>(
  State(state): State<AppState<S>>,
  claims: AuthClaims,
  Query(params): Query<ListParams>,
) -> Result<Json<Page<Incident>>, ApiError> {
  claims.require_any(&["incident:read"])?;

  let status = params
    .status
    .as_deref()
    .map(IncidentStatus::parse)
    .transpose()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let page = state
    .store
    .list_incidents(status, &params.page_request())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(page))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /incidents`
pub async fn create<S: VigilStore>(
  State(state): State<AppState<S>>,
  claims: AuthClaims,
  Json(input): Json<NewIncident>,
) -> Result<impl IntoResponse, ApiError> {
  claims.require_any(&["incident:write"])?;

  let incident = Incident::declare(input, claims.0.sub);
  let incident =
    state.store.save_incident(incident).await.map_err(ApiError::store)?;
  tracing::info!(
    incident_number = %incident.incident_number,
    severity = incident.severity.as_str(),
    "declared incident"
  );
  Ok((StatusCode::CREATED, Json(incident)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /incidents/{id}`
pub async fn get_one<S: VigilStore>(
  State(state): State<AppState<S>>,
  claims: AuthClaims,
  Path(id): Path<Uuid>,
) -> Result<Json<Incident>, ApiError> {
  claims.require_any(&["incident:read"])?;

  let incident = state
    .store
    .find_incident(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("incident {id} not found")))?;
  Ok(Json(incident))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /incidents/{id}` — patch semantics with the same set-once resolved
/// timestamp rule as cases.
pub async fn update<S: VigilStore>(
  State(state): State<AppState<S>>,
  claims: AuthClaims,
  Path(id): Path<Uuid>,
  Json(patch): Json<IncidentPatch>,
) -> Result<Json<Incident>, ApiError> {
  claims.require_any(&["incident:write"])?;

  let mut incident = state
    .store
    .find_incident(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("incident {id} not found")))?;
  incident.apply(patch);
  let incident =
    state.store.save_incident(incident).await.map_err(ApiError::store)?;
  Ok(Json(incident))
}

// ─── Updates log ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub content: String,
}

/// `POST /incidents/{id}/updates` — appends to the response log and records
/// the author as a responder.
pub async fn add_update<S: VigilStore>(
  State(state): State<AppState<S>>,
  claims: AuthClaims,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<impl IntoResponse, ApiError> {
  claims.require_any(&["incident:write"])?;

  let mut incident = state
    .store
    .find_incident(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("incident {id} not found")))?;
  let update = incident.append_update(body.content, claims.0.sub).clone();
  incident.add_responder(claims.0.sub);
  state.store.save_incident(incident).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(update)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /incidents/{id}`
pub async fn delete<S: VigilStore>(
  State(state): State<AppState<S>>,
  claims: AuthClaims,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  claims.require_any(&["ROLE_ADMIN"])?;

  let deleted =
    state.store.delete_incident(id).await.map_err(ApiError::store)?;
  if deleted {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("incident {id} not found")))
  }
}
