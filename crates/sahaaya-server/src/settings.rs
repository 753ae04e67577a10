//! Runtime server configuration, deserialised from `config.toml` plus
//! `SAHAAYA_*` environment overrides.
//!
//! The unit pool and responder roster are seeded here, once, at process
//! start; the running system only ever changes their status.

use sahaaya_core::{
  geo::{Coordinates, Location},
  responder::{Responder, ResponderKind, ResponderStatus},
  unit::ResponseUnit,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,

  /// Dispatch the nearest unit automatically on case creation.
  #[serde(default)]
  pub auto_dispatch: bool,

  /// TCP endpoint probed to classify new alerts online/offline.
  /// When unset, alerts are classified `online` unconditionally.
  pub probe_addr: Option<String>,
  #[serde(default = "default_probe_timeout_ms")]
  pub probe_timeout_ms: u64,

  #[serde(default)]
  pub units:      Vec<UnitSeed>,
  #[serde(default)]
  pub responders: Vec<ResponderSeed>,
}

fn default_probe_timeout_ms() -> u64 { 1_500 }

// ─── Seeds ───────────────────────────────────────────────────────────────────

/// One patrol unit as written in `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitSeed {
  pub call_sign: String,
  pub crew:      Vec<String>,
  pub label:     String,
  pub lat:       f64,
  pub lng:       f64,
}

impl UnitSeed {
  pub fn into_unit(self) -> ResponseUnit {
    ResponseUnit::new(self.call_sign, self.crew, Location::new(self.lat, self.lng, self.label))
  }
}

/// One roster entry as written in `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponderSeed {
  pub name: String,
  pub kind: ResponderKind,
  pub lat:  f64,
  pub lng:  f64,
}

impl ResponderSeed {
  pub fn into_responder(self) -> Responder {
    Responder {
      responder_id: Uuid::new_v4(),
      name:         self.name,
      kind:         self.kind,
      coordinates:  Coordinates { lat: self.lat, lng: self.lng },
      status:       ResponderStatus::Available,
    }
  }
}
