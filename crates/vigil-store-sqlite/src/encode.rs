//! Encoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, and whole records as compact JSON in the `doc` column.

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{Error, Result};
use vigil_core::query::{PageRequest, SortDirection};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Documents ───────────────────────────────────────────────────────────────

pub fn encode_doc<T: Serialize>(value: &T) -> Result<String> {
  Ok(serde_json::to_string(value)?)
}

pub fn decode_doc<T: DeserializeOwned>(s: &str) -> Result<T> {
  Ok(serde_json::from_str(s)?)
}

// ─── Sort order ──────────────────────────────────────────────────────────────

/// Columns a listing may sort on. Anything outside the whitelist falls back
/// to `created_at`; the requested name is never interpolated into SQL.
pub fn sort_column(requested: &str) -> &'static str {
  match requested {
    "created_at" | "createdAt" => "created_at",
    "updated_at" | "updatedAt" => "updated_at",
    "status" => "status",
    "priority" => "priority",
    _ => "created_at",
  }
}

/// `ORDER BY … LIMIT … OFFSET …` tail for a page window. Limit and offset
/// are integers formatted directly; the sort column comes from the
/// whitelist above.
pub fn page_clause(page: &PageRequest) -> String {
  let direction = match page.direction {
    SortDirection::Asc => "ASC",
    SortDirection::Desc => "DESC",
  };
  format!(
    "ORDER BY {} {} LIMIT {} OFFSET {}",
    sort_column(&page.sort_by),
    direction,
    page.size,
    page.offset()
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sort_column_whitelists() {
    assert_eq!(sort_column("createdAt"), "created_at");
    assert_eq!(sort_column("priority"), "priority");
    // Hostile input falls back instead of reaching the SQL string.
    assert_eq!(sort_column("created_at; DROP TABLE cases"), "created_at");
  }

  #[test]
  fn page_clause_formats_window() {
    let req = PageRequest {
      page:      2,
      size:      25,
      sort_by:   "status".into(),
      direction: SortDirection::Asc,
    };
    assert_eq!(page_clause(&req), "ORDER BY status ASC LIMIT 25 OFFSET 50");
  }
}
