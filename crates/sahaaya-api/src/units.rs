//! Handlers for `/units` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/units` | Full pool |
//! | `GET`  | `/units/available` | Optional `?lat=&lng=` for distance ranking |
//! | `GET`  | `/units/:id` | 404 if not found |
//! | `POST` | `/units/:id/on-scene` | Arrival at the assigned case |
//! | `POST` | `/units/:id/recover` | `returning → available` |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use sahaaya_core::{geo::Coordinates, unit::ResponseUnit};
use sahaaya_dispatch::RankedUnit;
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// `GET /units`
pub async fn list(State(state): State<AppState>) -> Json<Vec<ResponseUnit>> {
  Json(state.coordinator.units())
}

// ─── Available ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AvailableParams {
  pub lat: Option<f64>,
  pub lng: Option<f64>,
}

/// `GET /units/available[?lat=..&lng=..]`
pub async fn available(
  State(state): State<AppState>,
  Query(params): Query<AvailableParams>,
) -> Result<Json<Vec<RankedUnit>>, ApiError> {
  let at = match (params.lat, params.lng) {
    (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
    (None, None) => None,
    _ => {
      return Err(ApiError::BadRequest(
        "lat and lng must be supplied together".to_string(),
      ));
    }
  };
  Ok(Json(state.coordinator.available_units(at)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /units/:id`
pub async fn get_one(
  State(state): State<AppState>,
  Path(id): Path<Uuid>,
) -> Result<Json<ResponseUnit>, ApiError> {
  state
    .coordinator
    .unit(id)
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("unit {id} not found")))
}

// ─── Recovery transitions ─────────────────────────────────────────────────────

/// `POST /units/:id/on-scene`
pub async fn on_scene(
  State(state): State<AppState>,
  Path(id): Path<Uuid>,
) -> Result<Json<ResponseUnit>, ApiError> {
  Ok(Json(state.coordinator.unit_on_scene(id)?))
}

/// `POST /units/:id/recover`
pub async fn recover(
  State(state): State<AppState>,
  Path(id): Path<Uuid>,
) -> Result<Json<ResponseUnit>, ApiError> {
  Ok(Json(state.coordinator.recover_unit(id)?))
}
