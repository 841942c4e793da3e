//! Case — an escalated investigation record and its lifecycle.
//!
//! Status is an open transition graph: any authorised caller may move a case
//! to any status. The one transition side effect is the resolved timestamp:
//! entering `resolved` sets `resolved_at` exactly once, and no later
//! transition (including re-entering `resolved`) ever overwrites it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  note::{CaseNote, NewNote, append},
};

// ─── Status and priority ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseStatus {
  New,
  InProgress,
  Resolved,
  Closed,
}

impl CaseStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      CaseStatus::New => "new",
      CaseStatus::InProgress => "in-progress",
      CaseStatus::Resolved => "resolved",
      CaseStatus::Closed => "closed",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "new" => Ok(CaseStatus::New),
      "in-progress" => Ok(CaseStatus::InProgress),
      "resolved" => Ok(CaseStatus::Resolved),
      "closed" => Ok(CaseStatus::Closed),
      _ => Err(Error::UnknownCaseStatus(s.to_string())),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
  High,
  Medium,
  Low,
}

impl Priority {
  pub fn as_str(self) -> &'static str {
    match self {
      Priority::High => "high",
      Priority::Medium => "medium",
      Priority::Low => "low",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "high" => Ok(Priority::High),
      "medium" => Ok(Priority::Medium),
      "low" => Ok(Priority::Low),
      _ => Err(Error::UnknownPriority(s.to_string())),
    }
  }
}

// ─── Case ────────────────────────────────────────────────────────────────────

/// An investigation record. Owned by the system; `assigned_to` is a
/// non-owning reference to an identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
  pub case_id:             Uuid,
  /// Globally unique, immutable after creation. `FIR-` + 8 uppercase hex
  /// characters; effectively unique, not collision-checked.
  pub case_number:         String,
  pub title:               String,
  pub description:         String,
  pub status:              CaseStatus,
  pub priority:            Priority,
  pub case_type:           Option<String>,
  pub location:            Option<String>,
  pub district:            Option<String>,
  pub state:               Option<String>,
  pub latitude:            Option<f64>,
  pub longitude:           Option<f64>,
  pub complainant:         Option<String>,
  pub complainant_contact: Option<String>,
  pub assigned_to:         Uuid,
  /// Append-only audit trail; see [`crate::note`].
  pub notes:               Vec<CaseNote>,
  pub attachments:         Vec<String>,
  pub created_at:          DateTime<Utc>,
  pub updated_at:          DateTime<Utc>,
  pub reported_at:         Option<DateTime<Utc>>,
  /// Set exactly once, on the first transition into `resolved`.
  pub resolved_at:         Option<DateTime<Utc>>,
}

/// Input to [`Case::open`]. Status is not accepted: every case starts `new`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCase {
  pub title:               String,
  pub description:         String,
  pub priority:            Priority,
  pub case_type:           Option<String>,
  pub location:            Option<String>,
  pub district:            Option<String>,
  pub state:               Option<String>,
  pub latitude:            Option<f64>,
  pub longitude:           Option<f64>,
  pub complainant:         Option<String>,
  pub complainant_contact: Option<String>,
  pub reported_at:         Option<DateTime<Utc>>,
  /// Defaults to the creating identity when not supplied.
  pub assigned_to:         Option<Uuid>,
}

/// A field-level partial update. `None` always means "leave unchanged" —
/// including for the coordinates, so setting a coordinate to exactly 0.0 is
/// expressible with `Some(0.0)`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CasePatch {
  pub title:               Option<String>,
  pub description:         Option<String>,
  pub status:              Option<CaseStatus>,
  pub priority:            Option<Priority>,
  pub case_type:           Option<String>,
  pub location:            Option<String>,
  pub district:            Option<String>,
  pub state:               Option<String>,
  pub latitude:            Option<f64>,
  pub longitude:           Option<f64>,
  pub complainant:         Option<String>,
  pub complainant_contact: Option<String>,
  pub assigned_to:         Option<Uuid>,
}

impl Case {
  /// Open a new case on behalf of `creator`. The case number is generated,
  /// the status forced to `new`, and `assigned_to` falls back to the
  /// creator when the input does not name an assignee.
  pub fn open(input: NewCase, creator: Uuid) -> Self {
    let now = Utc::now();
    Self {
      case_id: Uuid::new_v4(),
      case_number: generate_case_number(),
      title: input.title,
      description: input.description,
      status: CaseStatus::New,
      priority: input.priority,
      case_type: input.case_type,
      location: input.location,
      district: input.district,
      state: input.state,
      latitude: input.latitude,
      longitude: input.longitude,
      complainant: input.complainant,
      complainant_contact: input.complainant_contact,
      assigned_to: input.assigned_to.unwrap_or(creator),
      notes: Vec::new(),
      attachments: Vec::new(),
      created_at: now,
      updated_at: now,
      reported_at: input.reported_at,
      resolved_at: None,
    }
  }

  /// Apply a partial update. Each field is written only when present in the
  /// patch. When the patch moves the status to `resolved` and `resolved_at`
  /// is still unset, the resolved timestamp is assigned; it is never
  /// overwritten afterwards.
  pub fn apply(&mut self, patch: CasePatch) {
    if let Some(title) = patch.title {
      self.title = title;
    }
    if let Some(description) = patch.description {
      self.description = description;
    }
    if let Some(status) = patch.status {
      self.status = status;
      if status == CaseStatus::Resolved && self.resolved_at.is_none() {
        self.resolved_at = Some(Utc::now());
      }
    }
    if let Some(priority) = patch.priority {
      self.priority = priority;
    }
    if let Some(case_type) = patch.case_type {
      self.case_type = Some(case_type);
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
    if let Some(complainant) = patch.complainant {
      self.complainant = Some(complainant);
    }
    if let Some(contact) = patch.complainant_contact {
      self.complainant_contact = Some(contact);
    }
    if let Some(assigned_to) = patch.assigned_to {
      self.assigned_to = assigned_to;
    }
    self.updated_at = Utc::now();
  }

  /// Append a note to the audit trail on behalf of `author`.
  pub fn append_note(&mut self, input: NewNote, author: Uuid) -> &CaseNote {
    self.updated_at = Utc::now();
    append(&mut self.notes, input, author)
  }
}

/// `FIR-` + the first 8 hex characters of a v4 UUID, uppercased.
fn generate_case_number() -> String {
  let id = Uuid::new_v4().simple().to_string();
  format!("FIR-{}", id[..8].to_ascii_uppercase())
}
