//! Store traits and supporting query types.
//!
//! Implemented by storage backends (e.g. `vigil-store-sqlite`). Higher layers
//! (`vigil-auth`, `vigil-api`) depend on these abstractions, not on any
//! concrete backend. The core holds no durable state of its own; concurrent
//! writers race at the store's last-write-wins granularity, and the core
//! performs no locking or retries — transient store failures propagate to
//! the caller as errors.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  case::Case,
  identity::{Identity, Role},
  incident::{Incident, IncidentStatus},
  query::{CasePredicate, Page, PageRequest},
  report::{Report, ReportStatus},
};

// ─── Identities ──────────────────────────────────────────────────────────────

/// Abstraction over the identity store backend.
pub trait IdentityStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert or replace an identity. The email column carries a unique
  /// index; a violation is reported through [`Self::is_duplicate_email`].
  fn save_identity(
    &self,
    identity: Identity,
  ) -> impl Future<Output = Result<Identity, Self::Error>> + Send + '_;

  /// Retrieve an identity by id. Returns `None` if not found.
  fn find_identity(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  /// Exact-match (case-sensitive) lookup on the unique email index.
  fn find_identity_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + 'a;

  fn email_exists<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn list_identities<'a>(
    &'a self,
    page: &'a PageRequest,
  ) -> impl Future<Output = Result<Page<Identity>, Self::Error>> + Send + 'a;

  fn identities_by_role(
    &self,
    role: Role,
  ) -> impl Future<Output = Result<Vec<Identity>, Self::Error>> + Send + '_;

  /// Irreversible. Returns `false` if no identity had that id.
  fn delete_identity(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Whether `err` represents a unique-constraint violation on the email
  /// column. Lets callers map a write-time duplicate to the same conflict
  /// error as the pre-write existence check, without knowing the backend.
  fn is_duplicate_email(err: &Self::Error) -> bool {
    let _ = err;
    false
  }
}

// ─── Cases ───────────────────────────────────────────────────────────────────

/// Abstraction over the case store backend.
pub trait CaseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert or replace a case (full-document write; last write wins).
  fn save_case(
    &self,
    case: Case,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  fn find_case(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + '_;

  fn find_case_by_number<'a>(
    &'a self,
    case_number: &'a str,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + 'a;

  /// Evaluate exactly one routed predicate (see
  /// [`crate::query::CaseFilter::route`]) over a page window.
  fn list_cases<'a>(
    &'a self,
    predicate: &'a CasePredicate,
    page: &'a PageRequest,
  ) -> impl Future<Output = Result<Page<Case>, Self::Error>> + Send + 'a;

  fn cases_created_between(
    &self,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<Case>, Self::Error>> + Send + '_;

  /// Case-insensitive substring match on the freeform location field.
  fn cases_at_location<'a>(
    &'a self,
    location: &'a str,
    page: &'a PageRequest,
  ) -> impl Future<Output = Result<Page<Case>, Self::Error>> + Send + 'a;

  /// Irreversible; no soft delete. Returns `false` if no case had that id.
  fn delete_case(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

// ─── Reports ─────────────────────────────────────────────────────────────────

/// Abstraction over the report store backend.
pub trait ReportStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn save_report(
    &self,
    report: Report,
  ) -> impl Future<Output = Result<Report, Self::Error>> + Send + '_;

  fn find_report(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Report>, Self::Error>> + Send + '_;

  /// List reports, optionally restricted by status and/or submitter. The
  /// submitter restriction backs the `report:read-own` capability.
  fn list_reports<'a>(
    &'a self,
    status: Option<ReportStatus>,
    reported_by: Option<Uuid>,
    page: &'a PageRequest,
  ) -> impl Future<Output = Result<Page<Report>, Self::Error>> + Send + 'a;

  fn delete_report(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

// ─── Incidents ───────────────────────────────────────────────────────────────

/// Abstraction over the incident store backend.
pub trait IncidentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn save_incident(
    &self,
    incident: Incident,
  ) -> impl Future<Output = Result<Incident, Self::Error>> + Send + '_;

  fn find_incident(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Incident>, Self::Error>> + Send + '_;

  fn list_incidents<'a>(
    &'a self,
    status: Option<IncidentStatus>,
    page: &'a PageRequest,
  ) -> impl Future<Output = Result<Page<Incident>, Self::Error>> + Send + 'a;

  fn delete_incident(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
