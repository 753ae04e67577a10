//! Geographic primitives and the distance model used for ranking.
//!
//! Distances are great-circle (haversine). The formula is deterministic for
//! identical inputs and monotonic in real-world separation, which is all the
//! matcher requires of it.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Average patrol speed through dense urban traffic, in km/h.
/// Drives the ETA estimate shown to operators.
const PATROL_SPEED_KMH: f64 = 27.0;

/// A WGS-84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
  pub lat: f64,
  pub lng: f64,
}

/// A coordinate pair plus the human-readable place name shown in the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
  pub coordinates: Coordinates,
  /// e.g. "Connaught Place, New Delhi".
  pub label:       String,
}

impl Location {
  pub fn new(lat: f64, lng: f64, label: impl Into<String>) -> Self {
    Self {
      coordinates: Coordinates { lat, lng },
      label:       label.into(),
    }
  }
}

/// Haversine great-circle distance between two points, in metres.
pub fn distance_m(a: Coordinates, b: Coordinates) -> f64 {
  let (lat_a, lat_b) = (a.lat.to_radians(), b.lat.to_radians());
  let d_lat = (b.lat - a.lat).to_radians();
  let d_lng = (b.lng - a.lng).to_radians();

  let h = (d_lat / 2.0).sin().powi(2)
    + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

  2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Estimated minutes for a patrol unit to cover `distance_m`, rounded up.
/// Never returns 0 for a nonzero distance.
pub fn eta_minutes(distance_m: f64) -> u32 {
  let metres_per_minute = PATROL_SPEED_KMH * 1000.0 / 60.0;
  (distance_m / metres_per_minute).ceil() as u32
}
