//! JSON REST API for the Sahaaya dispatch engine.
//!
//! Exposes an axum [`Router`] over a [`DispatchCoordinator`] and the
//! subject-side [`AlertSession`]. Auth, TLS, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", sahaaya_api::api_router(state.clone()))
//! ```

pub mod cases;
pub mod error;
pub mod responders;
pub mod sos;
pub mod units;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use sahaaya_dispatch::{AlertSession, DispatchCoordinator};

pub use error::ApiError;

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct AppState {
  pub coordinator: Arc<DispatchCoordinator>,
  pub session:     Arc<AlertSession>,
}

/// Build a fully-materialised API router for the dispatch engine.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router(state: AppState) -> Router<()> {
  Router::new()
    // Cases
    .route("/cases", get(cases::list).post(cases::create))
    .route("/cases/{id}", get(cases::get_one))
    .route("/cases/{id}/acknowledge", post(cases::acknowledge))
    .route("/cases/{id}/dispatch", post(cases::dispatch))
    .route("/cases/{id}/resolve", post(cases::resolve))
    // Dispatch room
    .route("/alerts", get(cases::alerts))
    .route("/stats", get(cases::stats))
    // Units
    .route("/units", get(units::list))
    .route("/units/available", get(units::available))
    .route("/units/{id}", get(units::get_one))
    .route("/units/{id}/on-scene", post(units::on_scene))
    .route("/units/{id}/recover", post(units::recover))
    // Responders
    .route("/responders", get(responders::nearby))
    // Subject device
    .route("/sos/context", post(sos::update_context))
    .route("/sos/tap", post(sos::tap))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
