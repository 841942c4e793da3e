//! Report — a citizen-submitted report awaiting review.
//!
//! Structurally parallel to [`crate::case::Case`] with its own status set.
//! The review decision (approve or reject) stamps `reviewed_at`/`reviewed_by`
//! once; conversion to a case records the resulting case id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, case::Priority};

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportStatus {
  New,
  Approved,
  Rejected,
  ConvertedToCase,
}

impl ReportStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      ReportStatus::New => "new",
      ReportStatus::Approved => "approved",
      ReportStatus::Rejected => "rejected",
      ReportStatus::ConvertedToCase => "converted-to-case",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "new" => Ok(ReportStatus::New),
      "approved" => Ok(ReportStatus::Approved),
      "rejected" => Ok(ReportStatus::Rejected),
      "converted-to-case" => Ok(ReportStatus::ConvertedToCase),
      _ => Err(Error::UnknownReportStatus(s.to_string())),
    }
  }
}

// ─── Report ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
  pub report_id:        Uuid,
  /// `RPT-` + 8 uppercase hex characters; immutable after creation.
  pub report_number:    String,
  pub report_type:      Option<String>,
  pub description:      String,
  pub status:           ReportStatus,
  pub priority:         Priority,
  pub location:         Option<String>,
  pub district:         Option<String>,
  pub state:            Option<String>,
  pub latitude:         Option<f64>,
  pub longitude:        Option<f64>,
  /// The submitting identity, or `None` for anonymous reports.
  pub reported_by:      Option<Uuid>,
  pub reporter_name:    Option<String>,
  pub reporter_contact: Option<String>,
  pub anonymous:        bool,
  pub reviewed_by:      Option<Uuid>,
  pub converted_case_id: Option<Uuid>,
  pub attachments:      Vec<String>,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
  /// Set once, on the first review decision.
  pub reviewed_at:      Option<DateTime<Utc>>,
}

/// Input to [`Report::submit`]. Every report starts in status `new`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReport {
  pub report_type:      Option<String>,
  pub description:      String,
  pub priority:         Priority,
  pub location:         Option<String>,
  pub district:         Option<String>,
  pub state:            Option<String>,
  pub latitude:         Option<f64>,
  pub longitude:        Option<f64>,
  pub reporter_name:    Option<String>,
  pub reporter_contact: Option<String>,
  #[serde(default)]
  pub anonymous:        bool,
}

/// Field-level partial update; `None` always means "leave unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportPatch {
  pub report_type: Option<String>,
  pub description: Option<String>,
  pub priority:    Option<Priority>,
  pub location:    Option<String>,
  pub district:    Option<String>,
  pub state:       Option<String>,
  pub latitude:    Option<f64>,
  pub longitude:   Option<f64>,
}

impl Report {
  /// Submit a new report. `submitter` is recorded unless the report is
  /// anonymous.
  pub fn submit(input: NewReport, submitter: Option<Uuid>) -> Self {
    let now = Utc::now();
    Self {
      report_id: Uuid::new_v4(),
      report_number: generate_report_number(),
      report_type: input.report_type,
      description: input.description,
      status: ReportStatus::New,
      priority: input.priority,
      location: input.location,
      district: input.district,
      state: input.state,
      latitude: input.latitude,
      longitude: input.longitude,
      reported_by: if input.anonymous { None } else { submitter },
      reporter_name: input.reporter_name,
      reporter_contact: input.reporter_contact,
      anonymous: input.anonymous,
      reviewed_by: None,
      converted_case_id: None,
      attachments: Vec::new(),
      created_at: now,
      updated_at: now,
      reviewed_at: None,
    }
  }

  /// Apply a partial update to the descriptive fields.
  pub fn apply(&mut self, patch: ReportPatch) {
    if let Some(report_type) = patch.report_type {
      self.report_type = Some(report_type);
    }
    if let Some(description) = patch.description {
      self.description = description;
    }
    if let Some(priority) = patch.priority {
      self.priority = priority;
    }
    if let Some(location) = patch.location {
      self.location = Some(location);
    }
    if let Some(district) = patch.district {
      self.district = Some(district);
    }
    if let Some(state) = patch.state {
      self.state = Some(state);
    }
    if let Some(latitude) = patch.latitude {
      self.latitude = Some(latitude);
    }
    if let Some(longitude) = patch.longitude {
      self.longitude = Some(longitude);
    }
    self.updated_at = Utc::now();
  }

  /// Record a review decision. The review timestamp and reviewer are stamped
  /// on the first decision only; later decisions update the status but keep
  /// the original review record.
  pub fn review(&mut self, decision: ReportStatus, reviewer: Uuid) {
    self.status = decision;
    if self.reviewed_at.is_none() {
      self.reviewed_at = Some(Utc::now());
      self.reviewed_by = Some(reviewer);
    }
    self.updated_at = Utc::now();
  }

  /// Mark this report as converted, linking the case that now carries it.
  pub fn convert_to_case(&mut self, case_id: Uuid, reviewer: Uuid) {
    self.converted_case_id = Some(case_id);
    self.review(ReportStatus::ConvertedToCase, reviewer);
  }
}

/// `RPT-` + the first 8 hex characters of a v4 UUID, uppercased.
fn generate_report_number() -> String {
  let id = Uuid::new_v4().simple().to_string();
  format!("RPT-{}", id[..8].to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn new_report() -> NewReport {
    NewReport {
      report_type: Some("vandalism".into()),
      description: "Graffiti on the underpass wall.".into(),
      priority: Priority::Low,
      location: Some("5th Street underpass".into()),
      district: Some("North".into()),
      state: None,
      latitude: None,
      longitude: None,
      reporter_name: Some("K. Rao".into()),
      reporter_contact: None,
      anonymous: false,
    }
  }

  #[test]
  fn submit_starts_new_with_generated_number() {
    let report = Report::submit(new_report(), Some(Uuid::new_v4()));
    assert_eq!(report.status, ReportStatus::New);
    assert!(report.report_number.starts_with("RPT-"));
    assert!(report.reviewed_at.is_none());
  }

  #[test]
  fn anonymous_submission_drops_the_submitter() {
    let mut input = new_report();
    input.anonymous = true;
    let report = Report::submit(input, Some(Uuid::new_v4()));
    assert!(report.reported_by.is_none());
    assert!(report.anonymous);
  }

  #[test]
  fn review_stamps_timestamp_once() {
    let mut report = Report::submit(new_report(), None);
    let reviewer = Uuid::new_v4();

    report.review(ReportStatus::Approved, reviewer);
    let stamped = report.reviewed_at.expect("stamped on first review");
    assert_eq!(report.reviewed_by, Some(reviewer));

    let second_reviewer = Uuid::new_v4();
    report.review(ReportStatus::Rejected, second_reviewer);
    assert_eq!(report.status, ReportStatus::Rejected);
    assert_eq!(report.reviewed_at, Some(stamped));
    assert_eq!(report.reviewed_by, Some(reviewer));
  }

  #[test]
  fn conversion_links_the_case() {
    let mut report = Report::submit(new_report(), None);
    let case_id = Uuid::new_v4();
    report.convert_to_case(case_id, Uuid::new_v4());
    assert_eq!(report.status, ReportStatus::ConvertedToCase);
    assert_eq!(report.converted_case_id, Some(case_id));
  }

  #[test]
  fn status_strings_round_trip() {
    for status in [
      ReportStatus::New,
      ReportStatus::Approved,
      ReportStatus::Rejected,
      ReportStatus::ConvertedToCase,
    ] {
      assert_eq!(ReportStatus::parse(status.as_str()).unwrap(), status);
    }
    assert!(ReportStatus::parse("pending").is_err());
  }
}
