//! Case — one tracked emergency incident from activation to resolution.
//!
//! A case is created `active` and moves monotonically through
//! `acknowledged`, `dispatched`, `resolved`. It is never deleted; `resolved`
//! is terminal. All mutation goes through the transition methods here, which
//! check their guard before writing so a failed call leaves the case
//! untouched.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, geo::Location};

// ─── Enums ───────────────────────────────────────────────────────────────────

/// Operator-facing severity of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Critical,
  High,
  Medium,
}

/// Connectivity mode decided once at activation. A case never migrates
/// between modes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SosMode {
  /// Live tracking over a data connection.
  Online,
  /// SMS-only fallback.
  Offline,
}

/// Lifecycle status of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
  Active,
  Acknowledged,
  Dispatched,
  Resolved,
}

impl CaseStatus {
  pub fn is_terminal(&self) -> bool { matches!(self, Self::Resolved) }
}

impl fmt::Display for CaseStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Active => "active",
      Self::Acknowledged => "acknowledged",
      Self::Dispatched => "dispatched",
      Self::Resolved => "resolved",
    };
    f.write_str(s)
  }
}

// ─── Snapshots ───────────────────────────────────────────────────────────────

/// Who the case is about, captured at alert time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSnapshot {
  pub name:  String,
  pub age:   Option<u8>,
  pub phone: String,
}

/// An emergency contact, snapshotted onto the case when the alert fires.
/// The live contact list belongs to the subject's profile, not to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardianContact {
  pub name:         String,
  pub phone:        String,
  pub relationship: Option<String>,
}

/// Device telemetry attached to a case when the subject's device reports it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Telemetry {
  pub movement_speed_kmh: Option<f64>,
  pub battery_percent:    Option<u8>,
}

// ─── Case ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
  pub case_id:    Uuid,
  pub subject:    SubjectSnapshot,
  pub location:   Location,
  /// Coordinator-assigned timestamp; never changes after creation.
  pub created_at: DateTime<Utc>,
  pub severity:   Severity,
  pub mode:       SosMode,
  pub status:     CaseStatus,
  pub telemetry:  Option<Telemetry>,
  pub contacts:   Vec<GuardianContact>,
}

impl Case {
  /// `active → acknowledged`.
  ///
  /// Acknowledging an already-acknowledged case is a no-op, not an error:
  /// duplicate operator clicks must be safe. From `dispatched` or
  /// `resolved` the guard fails and the case is unchanged.
  pub fn acknowledge(&mut self) -> Result<()> {
    match self.status {
      CaseStatus::Active => {
        self.status = CaseStatus::Acknowledged;
        Ok(())
      }
      CaseStatus::Acknowledged => Ok(()),
      from => Err(Error::InvalidTransition {
        case: self.case_id,
        from,
        action: "acknowledge",
      }),
    }
  }

  /// `{active, acknowledged} → dispatched`.
  ///
  /// Dispatch is reachable directly from `active`: urgent auto-dispatch may
  /// skip the explicit acknowledge step.
  pub fn mark_dispatched(&mut self) -> Result<()> {
    match self.status {
      CaseStatus::Active | CaseStatus::Acknowledged => {
        self.status = CaseStatus::Dispatched;
        Ok(())
      }
      from => Err(Error::InvalidTransition {
        case: self.case_id,
        from,
        action: "dispatch",
      }),
    }
  }

  /// Any non-terminal state `→ resolved`.
  ///
  /// Allowed from `active` and `acknowledged` as an operator override for
  /// false alarms.
  pub fn resolve(&mut self) -> Result<()> {
    if self.status.is_terminal() {
      return Err(Error::InvalidTransition {
        case: self.case_id,
        from: self.status,
        action: "resolve",
      });
    }
    self.status = CaseStatus::Resolved;
    Ok(())
  }
}

// ─── NewCase ─────────────────────────────────────────────────────────────────

/// Caller-supplied input to case creation. The coordinator assigns
/// `case_id`, `created_at`, and the initial `active` status.
///
/// Carries no randomness: simulated alerts are generated by the caller and
/// passed in, keeping transitions deterministic.
#[derive(Debug, Clone)]
pub struct NewCase {
  pub subject:   SubjectSnapshot,
  pub location:  Location,
  pub severity:  Severity,
  pub mode:      SosMode,
  pub telemetry: Option<Telemetry>,
  pub contacts:  Vec<GuardianContact>,
}

impl NewCase {
  /// Convenience constructor with no telemetry and no contacts.
  pub fn new(
    subject: SubjectSnapshot,
    location: Location,
    severity: Severity,
    mode: SosMode,
  ) -> Self {
    Self {
      subject,
      location,
      severity,
      mode,
      telemetry: None,
      contacts: Vec::new(),
    }
  }
}
