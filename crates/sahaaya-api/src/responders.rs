//! Handler for `GET /responders`.
//!
//! Nearby volunteers and guardians for a location, ascending by distance.
//! Recomputed per request; there is no stored case↔responder link.

use axum::{
  Json,
  extract::{Query, State},
};
use sahaaya_core::geo::Coordinates;
use sahaaya_dispatch::RankedResponder;
use serde::Deserialize;

use crate::AppState;

const DEFAULT_RADIUS_M: f64 = 500.0;

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
  pub lat:      f64,
  pub lng:      f64,
  /// Search radius in metres. Defaults to 500.
  pub radius_m: Option<f64>,
}

/// `GET /responders?lat=..&lng=..[&radius_m=..]`
pub async fn nearby(
  State(state): State<AppState>,
  Query(params): Query<NearbyParams>,
) -> Json<Vec<RankedResponder>> {
  let at = Coordinates { lat: params.lat, lng: params.lng };
  let radius = params.radius_m.unwrap_or(DEFAULT_RADIUS_M);
  Json(state.coordinator.nearby_responders(at, radius))
}
