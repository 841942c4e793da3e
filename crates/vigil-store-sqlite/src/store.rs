//! [`SqliteStore`] — the SQLite implementation of the Vigil store traits.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use vigil_core::{
  case::Case,
  identity::{Identity, Role},
  incident::{Incident, IncidentStatus},
  query::{CasePredicate, Page, PageRequest},
  report::{Report, ReportStatus},
  store::{CaseStore, IdentityStore, IncidentStore, ReportStore},
};

use crate::{
  Error, Result,
  encode::{decode_doc, encode_doc, encode_dt, encode_uuid, page_clause},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Vigil store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Writes are
/// full-document replacements: last write wins, matching the collaborator
/// document-store model.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Generic document helpers ──────────────────────────────────────────────

  /// Fetch the `doc` column of at most one row.
  async fn fetch_doc<T: DeserializeOwned>(
    &self,
    sql: &'static str,
    key: String,
  ) -> Result<Option<T>> {
    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(sql, rusqlite::params![key], |row| row.get(0))
            .optional()?,
        )
      })
      .await?;

    raw.as_deref().map(decode_doc).transpose()
  }

  /// Fetch the `doc` column of every matching row, in statement order.
  async fn fetch_docs<T: DeserializeOwned>(
    &self,
    sql: String,
    params: Vec<String>,
  ) -> Result<Vec<T>> {
    let raws: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), |row| {
            row.get(0)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.iter().map(|raw| decode_doc(raw)).collect()
  }

  /// Run a count plus a windowed select over one table and assemble a page.
  async fn fetch_page<T: DeserializeOwned>(
    &self,
    table: &'static str,
    where_clause: String,
    params: Vec<String>,
    page: &PageRequest,
  ) -> Result<Page<T>> {
    let count_sql = format!("SELECT COUNT(*) FROM {table} {where_clause}");
    let select_sql = format!(
      "SELECT doc FROM {table} {where_clause} {}",
      page_clause(page)
    );

    let (total, raws): (i64, Vec<String>) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          &count_sql,
          rusqlite::params_from_iter(params.iter()),
          |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&select_sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), |row| {
            row.get(0)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total, rows))
      })
      .await?;

    let items: Vec<T> =
      raws.iter().map(|raw| decode_doc(raw)).collect::<Result<_>>()?;
    Ok(Page::new(items, page.page, total as u64, page.size))
  }

  /// Delete one row by primary key; `true` if a row was removed.
  async fn delete_row(&self, sql: &'static str, key: String) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, rusqlite::params![key])?))
      .await?;
    Ok(removed > 0)
  }
}

// ─── IdentityStore ───────────────────────────────────────────────────────────

impl IdentityStore for SqliteStore {
  type Error = Error;

  async fn save_identity(&self, identity: Identity) -> Result<Identity> {
    let id_str = encode_uuid(identity.identity_id);
    let email = identity.email.clone();
    let role = identity.role.as_str().to_owned();
    let active = identity.active as i64;
    let created_str = encode_dt(identity.created_at);
    let updated_str = encode_dt(identity.updated_at);
    let doc = encode_doc(&identity)?;

    // Upsert keyed on the id so a same-row save never trips the email
    // unique index; a conflicting email on a different row still does.
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO identities
             (identity_id, email, role, active, created_at, updated_at, doc)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT(identity_id) DO UPDATE SET
             email      = excluded.email,
             role       = excluded.role,
             active     = excluded.active,
             created_at = excluded.created_at,
             updated_at = excluded.updated_at,
             doc        = excluded.doc",
          rusqlite::params![
            id_str,
            email,
            role,
            active,
            created_str,
            updated_str,
            doc,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(identity)
  }

  async fn find_identity(&self, id: Uuid) -> Result<Option<Identity>> {
    self
      .fetch_doc(
        "SELECT doc FROM identities WHERE identity_id = ?1",
        encode_uuid(id),
      )
      .await
  }

  async fn find_identity_by_email(&self, email: &str) -> Result<Option<Identity>> {
    self
      .fetch_doc(
        "SELECT doc FROM identities WHERE email = ?1",
        email.to_owned(),
      )
      .await
  }

  async fn email_exists(&self, email: &str) -> Result<bool> {
    let email = email.to_owned();
    let found: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM identities WHERE email = ?1",
              rusqlite::params![email],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(found.is_some())
  }

  async fn list_identities(&self, page: &PageRequest) -> Result<Page<Identity>> {
    self
      .fetch_page("identities", String::new(), Vec::new(), page)
      .await
  }

  async fn identities_by_role(&self, role: Role) -> Result<Vec<Identity>> {
    self
      .fetch_docs(
        "SELECT doc FROM identities WHERE role = ?1 ORDER BY created_at"
          .to_owned(),
        vec![role.as_str().to_owned()],
      )
      .await
  }

  async fn delete_identity(&self, id: Uuid) -> Result<bool> {
    self
      .delete_row(
        "DELETE FROM identities WHERE identity_id = ?1",
        encode_uuid(id),
      )
      .await
  }

  fn is_duplicate_email(err: &Error) -> bool {
    err.violates_unique("identities.email")
  }
}

// ─── CaseStore ───────────────────────────────────────────────────────────────

impl CaseStore for SqliteStore {
  type Error = Error;

  async fn save_case(&self, case: Case) -> Result<Case> {
    let id_str = encode_uuid(case.case_id);
    let number = case.case_number.clone();
    let status = case.status.as_str().to_owned();
    let priority = case.priority.as_str().to_owned();
    let district = case.district.clone();
    let location = case.location.clone();
    let assigned_str = encode_uuid(case.assigned_to);
    let created_str = encode_dt(case.created_at);
    let updated_str = encode_dt(case.updated_at);
    let doc = encode_doc(&case)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO cases
             (case_id, case_number, status, priority, district, location,
              assigned_to, created_at, updated_at, doc)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
           ON CONFLICT(case_id) DO UPDATE SET
             status      = excluded.status,
             priority    = excluded.priority,
             district    = excluded.district,
             location    = excluded.location,
             assigned_to = excluded.assigned_to,
             updated_at  = excluded.updated_at,
             doc         = excluded.doc",
          rusqlite::params![
            id_str,
            number,
            status,
            priority,
            district,
            location,
            assigned_str,
            created_str,
            updated_str,
            doc,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(case)
  }

  async fn find_case(&self, id: Uuid) -> Result<Option<Case>> {
    self
      .fetch_doc("SELECT doc FROM cases WHERE case_id = ?1", encode_uuid(id))
      .await
  }

  async fn find_case_by_number(&self, case_number: &str) -> Result<Option<Case>> {
    self
      .fetch_doc(
        "SELECT doc FROM cases WHERE case_number = ?1",
        case_number.to_owned(),
      )
      .await
  }

  async fn list_cases(
    &self,
    predicate: &CasePredicate,
    page: &PageRequest,
  ) -> Result<Page<Case>> {
    let (where_clause, params) = match predicate {
      CasePredicate::DistrictAndStatus { district, status } => (
        "WHERE district = ?1 AND status = ?2",
        vec![district.clone(), status.as_str().to_owned()],
      ),
      CasePredicate::PriorityAndStatus { priority, status } => (
        "WHERE priority = ?1 AND status = ?2",
        vec![priority.as_str().to_owned(), status.as_str().to_owned()],
      ),
      CasePredicate::Status(status) => {
        ("WHERE status = ?1", vec![status.as_str().to_owned()])
      }
      CasePredicate::AssignedTo(assignee) => {
        ("WHERE assigned_to = ?1", vec![encode_uuid(*assignee)])
      }
      CasePredicate::All => ("", Vec::new()),
    };

    self
      .fetch_page("cases", where_clause.to_owned(), params, page)
      .await
  }

  async fn cases_created_between(
    &self,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> Result<Vec<Case>> {
    // RFC 3339 UTC strings compare lexicographically in time order.
    self
      .fetch_docs(
        "SELECT doc FROM cases
         WHERE created_at >= ?1 AND created_at <= ?2
         ORDER BY created_at"
          .to_owned(),
        vec![encode_dt(start), encode_dt(end)],
      )
      .await
  }

  async fn cases_at_location(
    &self,
    location: &str,
    page: &PageRequest,
  ) -> Result<Page<Case>> {
    self
      .fetch_page(
        "cases",
        "WHERE location LIKE ?1 ESCAPE '\\' COLLATE NOCASE".to_owned(),
        vec![format!("%{}%", escape_like(location))],
        page,
      )
      .await
  }

  async fn delete_case(&self, id: Uuid) -> Result<bool> {
    self
      .delete_row("DELETE FROM cases WHERE case_id = ?1", encode_uuid(id))
      .await
  }
}

/// Escape LIKE metacharacters in user-supplied substrings.
fn escape_like(s: &str) -> String {
  s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

// ─── ReportStore ─────────────────────────────────────────────────────────────

impl ReportStore for SqliteStore {
  type Error = Error;

  async fn save_report(&self, report: Report) -> Result<Report> {
    let id_str = encode_uuid(report.report_id);
    let number = report.report_number.clone();
    let status = report.status.as_str().to_owned();
    let reporter_str = report.reported_by.map(encode_uuid);
    let district = report.district.clone();
    let created_str = encode_dt(report.created_at);
    let updated_str = encode_dt(report.updated_at);
    let doc = encode_doc(&report)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO reports
             (report_id, report_number, status, reported_by, district,
              created_at, updated_at, doc)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
           ON CONFLICT(report_id) DO UPDATE SET
             status      = excluded.status,
             reported_by = excluded.reported_by,
             district    = excluded.district,
             updated_at  = excluded.updated_at,
             doc         = excluded.doc",
          rusqlite::params![
            id_str,
            number,
            status,
            reporter_str,
            district,
            created_str,
            updated_str,
            doc,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(report)
  }

  async fn find_report(&self, id: Uuid) -> Result<Option<Report>> {
    self
      .fetch_doc(
        "SELECT doc FROM reports WHERE report_id = ?1",
        encode_uuid(id),
      )
      .await
  }

  async fn list_reports(
    &self,
    status: Option<ReportStatus>,
    reported_by: Option<Uuid>,
    page: &PageRequest,
  ) -> Result<Page<Report>> {
    let mut conds: Vec<String> = Vec::new();
    let mut params: Vec<String> = Vec::new();

    if let Some(status) = status {
      params.push(status.as_str().to_owned());
      conds.push(format!("status = ?{}", params.len()));
    }
    if let Some(reporter) = reported_by {
      params.push(encode_uuid(reporter));
      conds.push(format!("reported_by = ?{}", params.len()));
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };

    self.fetch_page("reports", where_clause, params, page).await
  }

  async fn delete_report(&self, id: Uuid) -> Result<bool> {
    self
      .delete_row("DELETE FROM reports WHERE report_id = ?1", encode_uuid(id))
      .await
  }
}

// ─── IncidentStore ───────────────────────────────────────────────────────────

impl IncidentStore for SqliteStore {
  type Error = Error;

  async fn save_incident(&self, incident: Incident) -> Result<Incident> {
    let id_str = encode_uuid(incident.incident_id);
    let number = incident.incident_number.clone();
    let status = incident.status.as_str().to_owned();
    let severity = incident.severity.as_str().to_owned();
    let district = incident.district.clone();
    let created_str = encode_dt(incident.created_at);
    let updated_str = encode_dt(incident.updated_at);
    let doc = encode_doc(&incident)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO incidents
             (incident_id, incident_number, status, severity, district,
              created_at, updated_at, doc)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
           ON CONFLICT(incident_id) DO UPDATE SET
             status     = excluded.status,
             severity   = excluded.severity,
             district   = excluded.district,
             updated_at = excluded.updated_at,
             doc        = excluded.doc",
          rusqlite::params![
            id_str,
            number,
            status,
            severity,
            district,
            created_str,
            updated_str,
            doc,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(incident)
  }

  async fn find_incident(&self, id: Uuid) -> Result<Option<Incident>> {
    self
      .fetch_doc(
        "SELECT doc FROM incidents WHERE incident_id = ?1",
        encode_uuid(id),
      )
      .await
  }

  async fn list_incidents(
    &self,
    status: Option<IncidentStatus>,
    page: &PageRequest,
  ) -> Result<Page<Incident>> {
    let (where_clause, params) = match status {
      Some(status) => {
        ("WHERE status = ?1".to_owned(), vec![status.as_str().to_owned()])
      }
      None => (String::new(), Vec::new()),
    };
    self.fetch_page("incidents", where_clause, params, page).await
  }

  async fn delete_incident(&self, id: Uuid) -> Result<bool> {
    self
      .delete_row(
        "DELETE FROM incidents WHERE incident_id = ?1",
        encode_uuid(id),
      )
      .await
  }
}
