//! Responder — an individual (volunteer or guardian) who might physically
//! assist with a case.
//!
//! Responders are roster entries; their association with a case is a query
//! result computed by the matcher, never a stored foreign key.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponderKind {
  Volunteer,
  Guardian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponderStatus {
  Available,
  /// Already moving toward some case.
  Responding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Responder {
  pub responder_id: Uuid,
  pub name:         String,
  pub kind:         ResponderKind,
  pub coordinates:  Coordinates,
  pub status:       ResponderStatus,
}
