//! Subject-device endpoints feeding the alert pipeline.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/sos/context` | Replace the device's alert context |
//! | `POST` | `/sos/tap` | One covert tap; returns the running count |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sahaaya_core::case::{GuardianContact, Severity, SubjectSnapshot, Telemetry};
use sahaaya_core::geo::Location;
use sahaaya_dispatch::AlertContext;
use serde::{Deserialize, Serialize};

use crate::AppState;

// ─── Context ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ContextBody {
  pub subject:   SubjectSnapshot,
  pub location:  Location,
  #[serde(default = "default_severity")]
  pub severity:  Severity,
  #[serde(default)]
  pub contacts:  Vec<GuardianContact>,
  #[serde(default)]
  pub telemetry: Option<Telemetry>,
}

fn default_severity() -> Severity { Severity::Critical }

/// `POST /sos/context`
pub async fn update_context(
  State(state): State<AppState>,
  Json(body): Json<ContextBody>,
) -> StatusCode {
  state.session.update_context(AlertContext {
    subject:   body.subject,
    location:  body.location,
    severity:  body.severity,
    contacts:  body.contacts,
    telemetry: body.telemetry,
  });
  StatusCode::NO_CONTENT
}

// ─── Tap ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TapResponse {
  /// Taps currently inside the rolling window; 0 right after activation.
  pub tap_count: u32,
}

/// `POST /sos/tap`
pub async fn tap(State(state): State<AppState>) -> impl IntoResponse {
  state.session.register_tap();
  (StatusCode::ACCEPTED, Json(TapResponse { tap_count: state.session.tap_count() }))
}
