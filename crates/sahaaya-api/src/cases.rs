//! Handlers for `/cases`, `/alerts`, and `/stats`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/cases` | Optional `?status=active\|acknowledged\|dispatched\|resolved` |
//! | `POST` | `/cases` | Body: [`CreateBody`]; returns 201 + case and suggested unit |
//! | `GET`  | `/cases/:id` | 404 if not found |
//! | `POST` | `/cases/:id/acknowledge` | 409 on guard failure |
//! | `POST` | `/cases/:id/dispatch` | Body: `{"unit_id": ...}`; omit for quick dispatch |
//! | `POST` | `/cases/:id/resolve` | Operator resolve, override included |
//! | `GET`  | `/alerts` | Unresolved cases, most-recent-first |
//! | `GET`  | `/stats` | Per-status case counts |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use sahaaya_core::case::{
  Case, CaseStatus, GuardianContact, NewCase, Severity, SosMode, SubjectSnapshot, Telemetry,
};
use sahaaya_core::geo::Location;
use sahaaya_dispatch::{CaseCounts, CaseCreated};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<CaseStatus>,
}

/// `GET /cases[?status=<status>]`
pub async fn list(
  State(state): State<AppState>,
  Query(params): Query<ListParams>,
) -> Json<Vec<Case>> {
  let cases = match params.status {
    Some(status) => state.coordinator.cases_with_status(status),
    None => state.coordinator.cases(),
  };
  Json(cases)
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// Operator-side case creation (simulated alerts included). Mock data is
/// the caller's business; the body arrives fully formed.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub subject:   SubjectSnapshot,
  pub location:  Location,
  pub severity:  Severity,
  pub mode:      SosMode,
  #[serde(default)]
  pub telemetry: Option<Telemetry>,
  #[serde(default)]
  pub contacts:  Vec<GuardianContact>,
}

/// `POST /cases`
pub async fn create(
  State(state): State<AppState>,
  Json(body): Json<CreateBody>,
) -> impl IntoResponse {
  let mut input = NewCase::new(body.subject, body.location, body.severity, body.mode);
  input.telemetry = body.telemetry;
  input.contacts = body.contacts;

  let created: CaseCreated = state.coordinator.create_case(input);
  (StatusCode::CREATED, Json(created))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /cases/:id`
pub async fn get_one(
  State(state): State<AppState>,
  Path(id): Path<Uuid>,
) -> Result<Json<Case>, ApiError> {
  state
    .coordinator
    .case(id)
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("case {id} not found")))
}

// ─── Transitions ──────────────────────────────────────────────────────────────

/// `POST /cases/:id/acknowledge`
pub async fn acknowledge(
  State(state): State<AppState>,
  Path(id): Path<Uuid>,
) -> Result<Json<Case>, ApiError> {
  Ok(Json(state.coordinator.acknowledge(id)?))
}

#[derive(Debug, Default, Deserialize)]
pub struct DispatchBody {
  /// Explicit unit choice; omit to quick-dispatch the nearest available.
  #[serde(default)]
  pub unit_id: Option<Uuid>,
}

/// `POST /cases/:id/dispatch` — body `{}` or `{"unit_id": "<uuid>"}`
pub async fn dispatch(
  State(state): State<AppState>,
  Path(id): Path<Uuid>,
  Json(body): Json<DispatchBody>,
) -> Result<Json<Case>, ApiError> {
  let case = match body.unit_id {
    Some(unit_id) => state.coordinator.dispatch(id, unit_id)?,
    None => state.coordinator.quick_dispatch(id)?,
  };
  Ok(Json(case))
}

/// `POST /cases/:id/resolve`
pub async fn resolve(
  State(state): State<AppState>,
  Path(id): Path<Uuid>,
) -> Result<Json<Case>, ApiError> {
  Ok(Json(state.coordinator.resolve(id)?))
}

// ─── Dispatch-room reads ──────────────────────────────────────────────────────

/// `GET /alerts`
pub async fn alerts(State(state): State<AppState>) -> Json<Vec<Case>> {
  Json(state.coordinator.incoming_alerts())
}

/// `GET /stats`
pub async fn stats(State(state): State<AppState>) -> Json<CaseCounts> {
  Json(state.coordinator.counts())
}
