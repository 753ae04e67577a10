//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Guard failures inside the core are conflicts, not server errors: the UI
//! must always get a determinate, renderable outcome, and
//! `no-units-available` has to be distinguishable from a successful
//! dispatch.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("{message}")]
  Conflict {
    /// Machine-readable tag, e.g. `no-units-available`.
    kind:    &'static str,
    message: String,
  },
}

impl From<sahaaya_core::Error> for ApiError {
  fn from(e: sahaaya_core::Error) -> Self {
    use sahaaya_core::Error;
    let kind = match &e {
      Error::CaseNotFound(_) | Error::UnitNotFound(_) => {
        return ApiError::NotFound(e.to_string());
      }
      Error::InvalidTransition { .. } => "invalid-transition",
      Error::InvalidUnitTransition { .. } => "invalid-unit-transition",
      Error::UnitUnavailable { .. } => "unit-unavailable",
      Error::NoUnitsAvailable => "no-units-available",
    };
    ApiError::Conflict { kind, message: e.to_string() }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match &self {
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Conflict { kind, message } => (
        StatusCode::CONFLICT,
        Json(json!({ "error": message, "kind": kind })),
      )
        .into_response(),
    }
  }
}
