//! JSON REST API for Vigil.
//!
//! Exposes an axum [`Router`] backed by any store implementing the four
//! `vigil-core` store traits. Every route except `/auth/signin` and
//! `/auth/signup` requires a bearer token; mutating and sensitive-read
//! handlers additionally check the caller's authorities before touching the
//! core (OR semantics across the listed authorities).

pub mod auth;
pub mod cases;
pub mod error;
pub mod extract;
pub mod incidents;
pub mod reports;
pub mod seed;
pub mod users;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use tower_http::trace::TraceLayer;
use vigil_auth::TokenKeys;
use vigil_core::store::{CaseStore, IdentityStore, IncidentStore, ReportStore};

pub use error::ApiError;

// ─── Store bound ─────────────────────────────────────────────────────────────

/// The combined store bound every handler works against.
pub trait VigilStore:
  IdentityStore + CaseStore + ReportStore + IncidentStore + Send + Sync + 'static
{
}

impl<S> VigilStore for S where
  S: IdentityStore + CaseStore + ReportStore + IncidentStore + Send + Sync + 'static
{
}

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// `VIGIL_*` environment.
#[derive(serde::Deserialize, Clone)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  /// Process-wide token signing secret; read-only after startup.
  pub token_secret:      String,
  /// Token lifetime in seconds.
  pub token_ttl_seconds: i64,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store: Arc<S>,
  pub keys:  Arc<TokenKeys>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), keys: self.keys.clone() }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
pub fn router<S: VigilStore>(state: AppState<S>) -> Router {
  Router::new()
    // Authentication
    .route("/auth/signin", post(auth::signin::<S>))
    .route("/auth/signup", post(auth::signup::<S>))
    .route("/auth/user", get(auth::current_user::<S>))
    // Cases
    .route("/cases", get(cases::list::<S>).post(cases::create::<S>))
    .route(
      "/cases/{id}",
      get(cases::get_one::<S>)
        .put(cases::update::<S>)
        .delete(cases::delete::<S>),
    )
    .route("/cases/{id}/notes", post(cases::add_note::<S>))
    // Reports
    .route("/reports", get(reports::list::<S>).post(reports::create::<S>))
    .route(
      "/reports/{id}",
      get(reports::get_one::<S>)
        .put(reports::update::<S>)
        .delete(reports::delete::<S>),
    )
    .route("/reports/{id}/review", post(reports::review::<S>))
    .route("/reports/{id}/convert", post(reports::convert::<S>))
    // Incidents
    .route(
      "/incidents",
      get(incidents::list::<S>).post(incidents::create::<S>),
    )
    .route(
      "/incidents/{id}",
      get(incidents::get_one::<S>)
        .put(incidents::update::<S>)
        .delete(incidents::delete::<S>),
    )
    .route("/incidents/{id}/updates", post(incidents::add_update::<S>))
    // Identity administration
    .route("/users", get(users::list::<S>))
    .route("/users/{id}", get(users::get_one::<S>).delete(users::delete::<S>))
    .route("/users/{id}/role", put(users::change_role::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
