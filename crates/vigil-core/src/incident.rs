//! Incident — an active emergency event and its response log.
//!
//! Follows the same patterns as [`crate::case::Case`]: a small status set
//! with a set-once resolved timestamp, and an append-only update log in
//! place of the case audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Status and severity ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
  Active,
  Contained,
  Resolved,
}

impl IncidentStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      IncidentStatus::Active => "active",
      IncidentStatus::Contained => "contained",
      IncidentStatus::Resolved => "resolved",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "active" => Ok(IncidentStatus::Active),
      "contained" => Ok(IncidentStatus::Contained),
      "resolved" => Ok(IncidentStatus::Resolved),
      _ => Err(Error::UnknownIncidentStatus(s.to_string())),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Critical,
  Major,
  Minor,
}

impl Severity {
  pub fn as_str(self) -> &'static str {
    match self {
      Severity::Critical => "critical",
      Severity::Major => "major",
      Severity::Minor => "minor",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "critical" => Ok(Severity::Critical),
      "major" => Ok(Severity::Major),
      "minor" => Ok(Severity::Minor),
      _ => Err(Error::UnknownSeverity(s.to_string())),
    }
  }
}

// ─── Update log ──────────────────────────────────────────────────────────────

/// An entry in the incident's append-only response log. Immutable once
/// appended, in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentUpdate {
  pub update_id:  Uuid,
  pub content:    String,
  pub created_by: Uuid,
  pub created_at: DateTime<Utc>,
}

// ─── Incident ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
  pub incident_id:     Uuid,
  /// `INC-` + 8 uppercase hex characters; immutable after creation.
  pub incident_number: String,
  pub title:           String,
  pub description:     String,
  pub incident_type:   Option<String>,
  pub severity:        Severity,
  pub status:          IncidentStatus,
  pub location:        Option<String>,
  pub district:        Option<String>,
  pub state:           Option<String>,
  pub latitude:        Option<f64>,
  pub longitude:       Option<f64>,
  pub reported_by:     Option<Uuid>,
  pub responders:      Vec<Uuid>,
  pub lead_responder:  Option<Uuid>,
  pub attachments:     Vec<String>,
  pub updates:         Vec<IncidentUpdate>,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
  pub reported_at:     Option<DateTime<Utc>>,
  /// Set exactly once, on the first transition into `resolved`.
  pub resolved_at:     Option<DateTime<Utc>>,
}

/// Input to [`Incident::declare`]. Every incident starts `active`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewIncident {
  pub title:         String,
  pub description:   String,
  pub incident_type: Option<String>,
  pub severity:      Severity,
  pub location:      Option<String>,
  pub district:      Option<String>,
  pub state:         Option<String>,
  pub latitude:      Option<f64>,
  pub longitude:     Option<f64>,
  pub reported_at:   Option<DateTime<Utc>>,
  pub lead_responder: Option<Uuid>,
}

/// Field-level partial update; `None` always means "leave unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncidentPatch {
  pub title:          Option<String>,
  pub description:    Option<String>,
  pub incident_type:  Option<String>,
  pub severity:       Option<Severity>,
  pub status:         Option<IncidentStatus>,
  pub location:       Option<String>,
  pub district:       Option<String>,
  pub state:          Option<String>,
  pub latitude:       Option<f64>,
  pub longitude:      Option<f64>,
  pub lead_responder: Option<Uuid>,
}

impl Incident {
  /// Declare a new incident on behalf of `reporter`.
  pub fn declare(input: NewIncident, reporter: Uuid) -> Self {
    let now = Utc::now();
    Self {
      incident_id: Uuid::new_v4(),
      incident_number: generate_incident_number(),
      title: input.title,
      description: input.description,
      incident_type: input.incident_type,
      severity: input.severity,
      status: IncidentStatus::Active,
      location: input.location,
      district: input.district,
      state: input.state,
      latitude: input.latitude,
      longitude: input.longitude,
      reported_by: Some(reporter),
      responders: Vec::new(),
      lead_responder: input.lead_responder,
      attachments: Vec::new(),
      updates: Vec::new(),
      created_at: now,
      updated_at: now,
      reported_at: input.reported_at,
      resolved_at: None,
    }
  }

  /// Apply a partial update, with the same resolved-timestamp rule as the
  /// case lifecycle.
  pub fn apply(&mut self, patch: IncidentPatch) {
    if let Some(title) = patch.title {
      self.title = title;
    }
    if let Some(description) = patch.description {
      self.description = description;
    }
    if let Some(incident_type) = patch.incident_type {
      self.incident_type = Some(incident_type);
    }
    if let Some(severity) = patch.severity {
      self.severity = severity;
    }
    if let Some(status) = patch.status {
      self.status = status;
      if status == IncidentStatus::Resolved && self.resolved_at.is_none() {
        self.resolved_at = Some(Utc::now());
      }
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
    if let Some(lead) = patch.lead_responder {
      self.lead_responder = Some(lead);
    }
    self.updated_at = Utc::now();
  }

  /// Append an entry to the response log; server-assigned timestamp.
  pub fn append_update(&mut self, content: String, author: Uuid) -> &IncidentUpdate {
    self.updates.push(IncidentUpdate {
      update_id:  Uuid::new_v4(),
      content,
      created_by: author,
      created_at: Utc::now(),
    });
    self.updated_at = Utc::now();
    self.updates.last().expect("just pushed")
  }

  /// Record a responder if not already present.
  pub fn add_responder(&mut self, responder: Uuid) {
    if !self.responders.contains(&responder) {
      self.responders.push(responder);
      self.updated_at = Utc::now();
    }
  }
}

/// `INC-` + the first 8 hex characters of a v4 UUID, uppercased.
fn generate_incident_number() -> String {
  let id = Uuid::new_v4().simple().to_string();
  format!("INC-{}", id[..8].to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn new_incident() -> NewIncident {
    NewIncident {
      title: "Gas leak".into(),
      description: "Strong smell reported near the market.".into(),
      incident_type: Some("hazmat".into()),
      severity: Severity::Major,
      location: Some("Old Market".into()),
      district: Some("Central".into()),
      state: None,
      latitude: None,
      longitude: None,
      reported_at: None,
      lead_responder: None,
    }
  }

  #[test]
  fn declare_starts_active() {
    let incident = Incident::declare(new_incident(), Uuid::new_v4());
    assert_eq!(incident.status, IncidentStatus::Active);
    assert!(incident.incident_number.starts_with("INC-"));
    assert!(incident.resolved_at.is_none());
  }

  #[test]
  fn resolving_sets_resolved_at_exactly_once() {
    let mut incident = Incident::declare(new_incident(), Uuid::new_v4());
    incident.apply(IncidentPatch {
      status: Some(IncidentStatus::Resolved),
      ..Default::default()
    });
    let first = incident.resolved_at.expect("set on resolve");

    incident.apply(IncidentPatch {
      status: Some(IncidentStatus::Active),
      ..Default::default()
    });
    incident.apply(IncidentPatch {
      status: Some(IncidentStatus::Resolved),
      ..Default::default()
    });
    assert_eq!(incident.resolved_at, Some(first));
  }

  #[test]
  fn update_log_is_append_only() {
    let mut incident = Incident::declare(new_incident(), Uuid::new_v4());
    let author = Uuid::new_v4();
    incident.append_update("crews dispatched".into(), author);
    let first = incident.updates[0].clone();

    incident.append_update("area cordoned".into(), author);
    assert_eq!(incident.updates.len(), 2);
    assert_eq!(incident.updates[0].content, first.content);
    assert_eq!(incident.updates[0].created_at, first.created_at);
  }

  #[test]
  fn responders_are_deduplicated() {
    let mut incident = Incident::declare(new_incident(), Uuid::new_v4());
    let responder = Uuid::new_v4();
    incident.add_responder(responder);
    incident.add_responder(responder);
    assert_eq!(incident.responders.len(), 1);
  }
}
