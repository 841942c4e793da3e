//! Demo-data bootstrap, invoked with `--seed`.
//!
//! Seeds a handful of accounts, cases, a report, and an incident so a fresh
//! deployment has something to look at. Runs only against an empty identity
//! store; a second invocation is a no-op.

use uuid::Uuid;
use vigil_core::{
  case::{Case, CasePatch, CaseStatus, NewCase, Priority},
  identity::Role,
  incident::{Incident, NewIncident, Severity},
  note::NewNote,
  query::PageRequest,
  report::{NewReport, Report},
};

use crate::{ApiError, VigilStore};

/// Seed demo data. Returns `false` (without writing) when identities
/// already exist.
pub async fn run<S: VigilStore>(store: &S) -> Result<bool, ApiError> {
  let existing = store
    .list_identities(&PageRequest::default())
    .await
    .map_err(ApiError::store)?;
  if existing.total_items > 0 {
    tracing::info!("identities already present, skipping seed");
    return Ok(false);
  }

  let admin = vigil_auth::register(
    store,
    "Admin User",
    "admin@vigil.example",
    "admin123",
    Role::Admin,
  )
  .await?;
  let officer_north = vigil_auth::register(
    store,
    "Officer Sharma",
    "officer1@vigil.example",
    "officer123",
    Role::Officer,
  )
  .await?;
  let officer_central = vigil_auth::register(
    store,
    "Officer Mendes",
    "officer2@vigil.example",
    "officer123",
    Role::Officer,
  )
  .await?;
  let citizen = vigil_auth::register(
    store,
    "Riya Kapoor",
    "user1@vigil.example",
    "user123",
    Role::User,
  )
  .await?;

  seed_cases(store, admin.identity_id, officer_north.identity_id, officer_central.identity_id)
    .await?;
  seed_report(store, citizen.identity_id).await?;
  seed_incident(store, officer_central.identity_id).await?;

  tracing::info!("seeded demo data");
  Ok(true)
}

async fn seed_cases<S: VigilStore>(
  store: &S,
  admin: Uuid,
  officer_north: Uuid,
  officer_central: Uuid,
) -> Result<(), ApiError> {
  let samples: [(&str, &str, Priority, &str, CaseStatus, Uuid); 4] = [
    (
      "Chain snatching near metro exit",
      "Two complainants reported a snatching at the east exit.",
      Priority::High,
      "Central",
      CaseStatus::InProgress,
      officer_central,
    ),
    (
      "Shop break-in on Mill Road",
      "Rear shutter forced overnight, stock missing.",
      Priority::Medium,
      "North",
      CaseStatus::New,
      officer_north,
    ),
    (
      "Stolen scooter recovered",
      "Vehicle traced through the pound registry.",
      Priority::Low,
      "West",
      CaseStatus::Resolved,
      officer_north,
    ),
    (
      "Noise complaint, closed on follow-up",
      "Repeat complaint at the banquet hall; resolved amicably.",
      Priority::Low,
      "South",
      CaseStatus::Closed,
      officer_central,
    ),
  ];

  for (title, description, priority, district, status, assignee) in samples {
    let mut case = Case::open(
      NewCase {
        title: title.into(),
        description: description.into(),
        priority,
        case_type: None,
        location: Some(format!("{district} district")),
        district: Some(district.into()),
        state: None,
        latitude: None,
        longitude: None,
        complainant: None,
        complainant_contact: None,
        reported_at: None,
        assigned_to: Some(assignee),
      },
      admin,
    );
    if status != CaseStatus::New {
      case.apply(CasePatch { status: Some(status), ..Default::default() });
    }
    case.append_note(
      NewNote { content: "Case registered at intake.".into(), internal: false },
      admin,
    );
    store.save_case(case).await.map_err(ApiError::store)?;
  }
  Ok(())
}

async fn seed_report<S: VigilStore>(
  store: &S,
  citizen: Uuid,
) -> Result<(), ApiError> {
  let report = Report::submit(
    NewReport {
      report_type: Some("vandalism".into()),
      description: "Graffiti across the underpass wall on 5th Street.".into(),
      priority: Priority::Low,
      location: Some("5th Street underpass".into()),
      district: Some("East".into()),
      state: None,
      latitude: None,
      longitude: None,
      reporter_name: Some("Riya Kapoor".into()),
      reporter_contact: None,
      anonymous: false,
    },
    Some(citizen),
  );
  store.save_report(report).await.map_err(ApiError::store)?;
  Ok(())
}

async fn seed_incident<S: VigilStore>(
  store: &S,
  officer: Uuid,
) -> Result<(), ApiError> {
  let mut incident = Incident::declare(
    NewIncident {
      title: "Gas leak near Old Market".into(),
      description: "Strong smell reported by several vendors.".into(),
      incident_type: Some("hazmat".into()),
      severity: Severity::Major,
      location: Some("Old Market".into()),
      district: Some("Central".into()),
      state: None,
      latitude: None,
      longitude: None,
      reported_at: None,
      lead_responder: Some(officer),
    },
    officer,
  );
  incident.append_update("Crews dispatched, area cordoned.".into(), officer);
  incident.add_responder(officer);
  store.save_incident(incident).await.map_err(ApiError::store)?;
  Ok(())
}
