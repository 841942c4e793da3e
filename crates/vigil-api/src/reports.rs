//! Handlers for `/reports` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/reports` | Readers see all; `report:read-own` callers see their own |
//! | `POST`   | `/reports` | Open to the `user` role (`report:create`) |
//! | `GET`    | `/reports/{id}` | Own-report access for submitters |
//! | `PUT`    | `/reports/{id}` | Partial update |
//! | `POST`   | `/reports/{id}/review` | Decision: `approved` or `rejected` |
//! | `POST`   | `/reports/{id}/convert` | Opens a case from the report |
//! | `DELETE` | `/reports/{id}` | Admin only |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use vigil_core::{
  case::{Case, NewCase},
  query::{Page, PageRequest, SortDirection},
  report::{NewReport, Report, ReportPatch, ReportStatus},
};

use crate::{ApiError, AppState, VigilStore, extract::AuthClaims};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status:      Option<String>,
  pub reported_by: Option<Uuid>,
  pub page:        Option<usize>,
  pub size:        Option<usize>,
  pub sort_by:     Option<String>,
  pub direction:   Option<SortDirection>,
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

/// `GET /reports`
///
/// `report:read` callers see every report and may filter by status and
/// submitter. `report:read-own` callers are pinned to their own submissions
/// regardless of the params.
pub async fn list<S: VigilStore>(
  State(state): State<AppState<S>>,
  claims: AuthClaims,
  Query(params): Query<ListParams>,
) -> Result<Json<Page<Report>>, ApiError> {
  let status = params
    .status
    .as_deref()
    .map(ReportStatus::parse)
    .transpose()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let reported_by = if claims.0.has_any(&["report:read"]) {
    params.reported_by
  } else {
    claims.require_any(&["report:read-own"])?;
    Some(claims.0.sub)
  };

  let page = state
    .store
    .list_reports(status, reported_by, &params.page_request())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(page))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /reports` — the submitter is recorded unless the report is
/// anonymous.
pub async fn create<S: VigilStore>(
  State(state): State<AppState<S>>,
  claims: AuthClaims,
  Json(input): Json<NewReport>,
) -> Result<impl IntoResponse, ApiError> {
  claims.require_any(&["report:create", "report:write"])?;

  let report = Report::submit(input, Some(claims.0.sub));
  let report =
    state.store.save_report(report).await.map_err(ApiError::store)?;
  tracing::info!(report_number = %report.report_number, "submitted report");
  Ok((StatusCode::CREATED, Json(report)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /reports/{id}` — a `report:read-own` caller gets 404 for another
/// submitter's report, so existence does not leak.
pub async fn get_one<S: VigilStore>(
  State(state): State<AppState<S>>,
  claims: AuthClaims,
  Path(id): Path<Uuid>,
) -> Result<Json<Report>, ApiError> {
  let report = state
    .store
    .find_report(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("report {id} not found")))?;

  if !claims.0.has_any(&["report:read"]) {
    claims.require_any(&["report:read-own"])?;
    if report.reported_by != Some(claims.0.sub) {
      return Err(ApiError::NotFound(format!("report {id} not found")));
    }
  }
  Ok(Json(report))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /reports/{id}`
pub async fn update<S: VigilStore>(
  State(state): State<AppState<S>>,
  claims: AuthClaims,
  Path(id): Path<Uuid>,
  Json(patch): Json<ReportPatch>,
) -> Result<Json<Report>, ApiError> {
  claims.require_any(&["report:write"])?;

  let mut report = state
    .store
    .find_report(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("report {id} not found")))?;
  report.apply(patch);
  let report =
    state.store.save_report(report).await.map_err(ApiError::store)?;
  Ok(Json(report))
}

// ─── Review ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReviewBody {
  pub decision: String,
}

/// `POST /reports/{id}/review` — the only decisions are `approved` and
/// `rejected`; conversion has its own endpoint.
pub async fn review<S: VigilStore>(
  State(state): State<AppState<S>>,
  claims: AuthClaims,
  Path(id): Path<Uuid>,
  Json(body): Json<ReviewBody>,
) -> Result<Json<Report>, ApiError> {
  claims.require_any(&["report:write"])?;

  let decision = ReportStatus::parse(&body.decision)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  if !matches!(decision, ReportStatus::Approved | ReportStatus::Rejected) {
    return Err(ApiError::BadRequest(format!(
      "decision must be approved or rejected, got {}",
      decision.as_str()
    )));
  }

  let mut report = state
    .store
    .find_report(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("report {id} not found")))?;
  report.review(decision, claims.0.sub);
  let report =
    state.store.save_report(report).await.map_err(ApiError::store)?;
  tracing::info!(report_number = %report.report_number, decision = decision.as_str(), "reviewed report");
  Ok(Json(report))
}

// ─── Convert ──────────────────────────────────────────────────────────────────

/// `POST /reports/{id}/convert` — opens a case carrying the report's fields,
/// marks the report converted, and returns the new case.
pub async fn convert<S: VigilStore>(
  State(state): State<AppState<S>>,
  claims: AuthClaims,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
  claims.require_any(&["report:write"])?;
  claims.require_any(&["case:write"])?;

  let mut report = state
    .store
    .find_report(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("report {id} not found")))?;
  if report.status == ReportStatus::ConvertedToCase {
    return Err(ApiError::Conflict(format!(
      "report {} is already converted",
      report.report_number
    )));
  }

  let title = report
    .report_type
    .clone()
    .unwrap_or_else(|| format!("Converted report {}", report.report_number));
  let case = Case::open(
    NewCase {
      title,
      description: report.description.clone(),
      priority: report.priority,
      case_type: report.report_type.clone(),
      location: report.location.clone(),
      district: report.district.clone(),
      state: report.state.clone(),
      latitude: report.latitude,
      longitude: report.longitude,
      complainant: report.reporter_name.clone(),
      complainant_contact: report.reporter_contact.clone(),
      reported_at: Some(report.created_at),
      assigned_to: None,
    },
    claims.0.sub,
  );

  let case = state.store.save_case(case).await.map_err(ApiError::store)?;
  report.convert_to_case(case.case_id, claims.0.sub);
  state.store.save_report(report).await.map_err(ApiError::store)?;

  tracing::info!(case_number = %case.case_number, "converted report to case");
  Ok((StatusCode::CREATED, Json(crate::cases::redact_internal(case, &claims.0))))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /reports/{id}`
pub async fn delete<S: VigilStore>(
  State(state): State<AppState<S>>,
  claims: AuthClaims,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  claims.require_any(&["ROLE_ADMIN"])?;

  let deleted =
    state.store.delete_report(id).await.map_err(ApiError::store)?;
  if deleted {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("report {id} not found")))
  }
}
