//! Error type for `vigil-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] vigil_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl Error {
  /// True when the underlying failure is a unique-constraint violation on
  /// the named column (e.g. `"identities.email"`).
  pub fn violates_unique(&self, column: &str) -> bool {
    if let Error::Database(tokio_rusqlite::Error::Rusqlite(
      rusqlite::Error::SqliteFailure(inner, Some(message)),
    )) = self
    {
      return inner.code == rusqlite::ErrorCode::ConstraintViolation
        && message.contains(column);
    }
    false
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
