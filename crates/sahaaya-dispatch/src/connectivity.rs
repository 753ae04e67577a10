//! Connectivity classification: online (live tracking) vs. offline
//! (SMS-only) handling for a newly activated alert.
//!
//! The classifier is invoked exactly once per activation, before case
//! creation; the decision is stamped onto the case and never revisited.

use std::future::Future;

use sahaaya_core::case::SosMode;
use tokio::time::Duration;

/// Policy hook deciding the mode for a new alert.
pub trait ConnectivityClassifier: Send + Sync {
  fn classify(&self) -> impl Future<Output = SosMode> + Send + '_;
}

// ─── Fixed policy ────────────────────────────────────────────────────────────

/// Always returns the configured mode. Used by tests and demo wiring.
#[derive(Debug, Clone, Copy)]
pub struct FixedClassifier(pub SosMode);

impl ConnectivityClassifier for FixedClassifier {
  async fn classify(&self) -> SosMode { self.0 }
}

// ─── Reachability probe ──────────────────────────────────────────────────────

/// Classifies by attempting a TCP connection to a known-good endpoint
/// within a bounded timeout. Anything short of a completed connect — refused,
/// unreachable, timed out — is `offline`.
#[derive(Debug, Clone)]
pub struct TcpProbeClassifier {
  pub probe_addr: String,
  pub timeout:    Duration,
}

impl TcpProbeClassifier {
  pub fn new(probe_addr: impl Into<String>, timeout: Duration) -> Self {
    Self { probe_addr: probe_addr.into(), timeout }
  }
}

impl ConnectivityClassifier for TcpProbeClassifier {
  async fn classify(&self) -> SosMode {
    let attempt = tokio::net::TcpStream::connect(&self.probe_addr);
    match tokio::time::timeout(self.timeout, attempt).await {
      Ok(Ok(_)) => SosMode::Online,
      Ok(Err(e)) => {
        tracing::warn!(addr = %self.probe_addr, error = %e, "reachability probe failed");
        SosMode::Offline
      }
      Err(_) => {
        tracing::warn!(addr = %self.probe_addr, "reachability probe timed out");
        SosMode::Offline
      }
    }
  }
}

// ─── Config-selected classifier ──────────────────────────────────────────────

/// Concrete classifier chosen by server configuration, so callers stay
/// generic without trait objects.
#[derive(Debug, Clone)]
pub enum Classifier {
  Fixed(FixedClassifier),
  Probe(TcpProbeClassifier),
}

impl ConnectivityClassifier for Classifier {
  async fn classify(&self) -> SosMode {
    match self {
      Self::Fixed(c) => c.classify().await,
      Self::Probe(c) => c.classify().await,
    }
  }
}
