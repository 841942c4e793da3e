//! Error types for `vigil-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("identity not found: {0}")]
  IdentityNotFound(Uuid),

  #[error("case not found: {0}")]
  CaseNotFound(Uuid),

  #[error("report not found: {0}")]
  ReportNotFound(Uuid),

  #[error("incident not found: {0}")]
  IncidentNotFound(Uuid),

  #[error("unknown role: {0:?}")]
  UnknownRole(String),

  #[error("unknown case status: {0:?}")]
  UnknownCaseStatus(String),

  #[error("unknown report status: {0:?}")]
  UnknownReportStatus(String),

  #[error("unknown incident status: {0:?}")]
  UnknownIncidentStatus(String),

  #[error("unknown priority: {0:?}")]
  UnknownPriority(String),

  #[error("unknown severity: {0:?}")]
  UnknownSeverity(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
