//! AlertSession — the subject-side pipeline from covert gesture to case.
//!
//! Owns a [`TriggerDetector`] and a consumer task that turns each
//! activation into a case: classify connectivity once, snapshot the
//! device's current alert context, create the case. The context (who and
//! where the subject is, their contacts, telemetry) is pushed by the device
//! ahead of time and merely read at activation, so the core itself stays
//! free of randomness and lookups.

use std::sync::{Arc, Mutex};

use sahaaya_core::case::{GuardianContact, NewCase, Severity, SubjectSnapshot, Telemetry};
use sahaaya_core::geo::Location;
use tokio::task::JoinHandle;

use crate::{
  connectivity::ConnectivityClassifier,
  coordinator::DispatchCoordinator,
  trigger::{TriggerConfig, TriggerDetector},
};

/// The device's current state, snapshotted onto the case at activation.
#[derive(Debug, Clone)]
pub struct AlertContext {
  pub subject:   SubjectSnapshot,
  pub location:  Location,
  pub severity:  Severity,
  pub contacts:  Vec<GuardianContact>,
  pub telemetry: Option<Telemetry>,
}

pub struct AlertSession {
  detector: TriggerDetector,
  context:  Arc<Mutex<Option<AlertContext>>>,
  consumer: JoinHandle<()>,
}

impl AlertSession {
  /// Start the pipeline. The classifier is consulted exactly once per
  /// activation, before the case exists; its verdict is immutable for the
  /// case's lifetime.
  pub fn spawn<C>(
    trigger: TriggerConfig,
    classifier: C,
    coordinator: Arc<DispatchCoordinator>,
  ) -> Self
  where
    C: ConnectivityClassifier + 'static,
  {
    let (detector, mut activations) = TriggerDetector::new(trigger);
    let context = Arc::new(Mutex::new(None::<AlertContext>));

    let ctx = Arc::clone(&context);
    let consumer = tokio::spawn(async move {
      while let Some(activation) = activations.recv().await {
        let snapshot = ctx.lock().expect("alert context lock poisoned").clone();
        let Some(snapshot) = snapshot else {
          tracing::warn!("activation before any alert context was set, dropped");
          continue;
        };

        let mode = classifier.classify().await;
        let mut input =
          NewCase::new(snapshot.subject, snapshot.location, snapshot.severity, mode);
        input.contacts = snapshot.contacts;
        input.telemetry = snapshot.telemetry;

        let created = coordinator.create_case(input);
        tracing::info!(
          case = %created.case.case_id,
          activated_at = %activation.at,
          mode = ?mode,
          "alert escalated to case"
        );
      }
    });

    Self { detector, context, consumer }
  }

  /// One covert tap from the device.
  pub fn register_tap(&self) { self.detector.register_tap() }

  pub fn tap_count(&self) -> u32 { self.detector.tap_count() }

  /// Replace the device's alert context (location fix, telemetry refresh,
  /// contact edits).
  pub fn update_context(&self, context: AlertContext) {
    *self.context.lock().expect("alert context lock poisoned") = Some(context);
  }

  /// Tear down: cancel any pending tap window and stop consuming.
  pub fn shutdown(&self) {
    self.detector.reset();
    self.consumer.abort();
  }
}
