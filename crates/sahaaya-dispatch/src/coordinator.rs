//! DispatchCoordinator — the owned, encapsulated store for cases and the
//! unit pool, and the only place either is mutated.
//!
//! All state sits behind one mutex, so concurrent transitions serialize:
//! two dispatches racing for the same unit resolve with exactly one winner,
//! the loser observing `UnitUnavailable` and an unchanged case. Reads hand
//! out snapshots, never live references.

use std::{
  collections::VecDeque,
  sync::{Mutex, MutexGuard},
};

use chrono::Utc;
use sahaaya_core::{
  Error, Result,
  case::{Case, CaseStatus, NewCase},
  geo::{self, Coordinates},
  unit::{ResponseUnit, UnitStatus},
};
use serde::Serialize;
use uuid::Uuid;

use crate::matcher::{RankedResponder, RankedUnit, ResponderMatcher, rank_available_units};

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinatorConfig {
  /// Dispatch the nearest available unit as part of case creation instead
  /// of only suggesting it.
  pub auto_dispatch: bool,
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// Result of case creation: the stored case plus the nearest-unit
/// suggestion the operator UI surfaces alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct CaseCreated {
  pub case:           Case,
  pub suggested_unit: Option<RankedUnit>,
}

/// Per-status tallies for the dashboard header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CaseCounts {
  pub active:       usize,
  pub acknowledged: usize,
  pub dispatched:   usize,
  pub resolved:     usize,
}

// ─── Coordinator ─────────────────────────────────────────────────────────────

struct Inner {
  /// Most-recent-first; insertion order is never re-sorted by status.
  cases: VecDeque<Case>,
  units: Vec<ResponseUnit>,
}

pub struct DispatchCoordinator {
  config:  CoordinatorConfig,
  matcher: ResponderMatcher,
  inner:   Mutex<Inner>,
}

impl DispatchCoordinator {
  /// The unit pool is fixed at construction (config load); units change
  /// status but are never added or removed afterwards.
  pub fn new(
    config: CoordinatorConfig,
    units: Vec<ResponseUnit>,
    matcher: ResponderMatcher,
  ) -> Self {
    Self {
      config,
      matcher,
      inner: Mutex::new(Inner { cases: VecDeque::new(), units }),
    }
  }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().expect("dispatch state lock poisoned")
  }

  // ── Case creation ─────────────────────────────────────────────────────

  /// Allocate a new `active` case, prepend it to the incoming list, and
  /// rank the unit pool against its location for a suggestion. The
  /// suggestion is only acted on when `auto_dispatch` is configured.
  pub fn create_case(&self, input: NewCase) -> CaseCreated {
    let mut inner = self.lock();

    let case = Case {
      case_id:    Uuid::new_v4(),
      subject:    input.subject,
      location:   input.location,
      created_at: Utc::now(),
      severity:   input.severity,
      mode:       input.mode,
      status:     CaseStatus::Active,
      telemetry:  input.telemetry,
      contacts:   input.contacts,
    };
    tracing::info!(
      case = %case.case_id,
      severity = ?case.severity,
      mode = ?case.mode,
      location = %case.location.label,
      "case created"
    );
    inner.cases.push_front(case.clone());

    let ranked = rank_available_units(&inner.units, Some(case.location.coordinates));
    let suggested_unit = ranked.into_iter().next();

    if self.config.auto_dispatch
      && let Some(suggestion) = &suggested_unit
    {
      // The case was created `active` one statement ago; this cannot fail.
      if let Ok(updated) = dispatch_locked(&mut inner, case.case_id, suggestion.unit.unit_id) {
        return CaseCreated { case: updated, suggested_unit };
      }
    }

    CaseCreated { case, suggested_unit }
  }

  // ── Case transitions ──────────────────────────────────────────────────

  pub fn acknowledge(&self, case_id: Uuid) -> Result<Case> {
    let mut inner = self.lock();
    let case = find_case(&mut inner.cases, case_id)?;
    case.acknowledge()?;
    tracing::debug!(case = %case_id, "case acknowledged");
    Ok(case.clone())
  }

  /// Dispatch `unit_id` to `case_id`.
  ///
  /// Enforces the case guard (`active` or `acknowledged`) and unit
  /// availability under one lock; which unit is *sensible* is the caller's
  /// concern (or [`Self::quick_dispatch`]'s).
  pub fn dispatch(&self, case_id: Uuid, unit_id: Uuid) -> Result<Case> {
    let mut inner = self.lock();
    dispatch_locked(&mut inner, case_id, unit_id)
  }

  /// Dispatch the nearest available unit, or report `NoUnitsAvailable`
  /// and leave the case untouched for manual intervention.
  pub fn quick_dispatch(&self, case_id: Uuid) -> Result<Case> {
    let mut inner = self.lock();
    let at = find_case(&mut inner.cases, case_id)?.location.coordinates;

    let nearest = rank_available_units(&inner.units, Some(at))
      .into_iter()
      .next()
      .ok_or(Error::NoUnitsAvailable)?;
    dispatch_locked(&mut inner, case_id, nearest.unit.unit_id)
  }

  /// Resolve a case from any non-terminal state (operator override for
  /// false alarms included). An assigned unit is released to `returning` —
  /// not to `available`; recovery is the separate [`Self::recover_unit`]
  /// step.
  pub fn resolve(&self, case_id: Uuid) -> Result<Case> {
    let mut inner = self.lock();
    let case = find_case(&mut inner.cases, case_id)?;
    case.resolve()?;
    let resolved = case.clone();

    if let Some(unit) = inner
      .units
      .iter_mut()
      .find(|u| u.assigned_case_id == Some(case_id))
    {
      // Dispatched or on-scene by the assignment invariant.
      unit.release()?;
      tracing::info!(case = %case_id, unit = %unit.unit_id, "unit released, returning");
    }
    tracing::info!(case = %case_id, "case resolved");
    Ok(resolved)
  }

  // ── Unit recovery ─────────────────────────────────────────────────────

  pub fn unit_on_scene(&self, unit_id: Uuid) -> Result<ResponseUnit> {
    let mut inner = self.lock();
    let unit = find_unit(&mut inner.units, unit_id)?;
    unit.mark_on_scene()?;
    tracing::info!(unit = %unit_id, "unit on scene");
    Ok(unit.clone())
  }

  /// `returning → available`, ending the recovery window.
  pub fn recover_unit(&self, unit_id: Uuid) -> Result<ResponseUnit> {
    let mut inner = self.lock();
    let unit = find_unit(&mut inner.units, unit_id)?;
    unit.recover()?;
    tracing::info!(unit = %unit_id, "unit recovered");
    Ok(unit.clone())
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All unresolved cases, most-recent-first by insertion order —
  /// independent of any status changes since.
  pub fn incoming_alerts(&self) -> Vec<Case> {
    self
      .lock()
      .cases
      .iter()
      .filter(|c| !c.status.is_terminal())
      .cloned()
      .collect()
  }

  pub fn cases(&self) -> Vec<Case> { self.lock().cases.iter().cloned().collect() }

  pub fn cases_with_status(&self, status: CaseStatus) -> Vec<Case> {
    self
      .lock()
      .cases
      .iter()
      .filter(|c| c.status == status)
      .cloned()
      .collect()
  }

  pub fn case(&self, case_id: Uuid) -> Option<Case> {
    self.lock().cases.iter().find(|c| c.case_id == case_id).cloned()
  }

  pub fn units(&self) -> Vec<ResponseUnit> { self.lock().units.clone() }

  pub fn unit(&self, unit_id: Uuid) -> Option<ResponseUnit> {
    self.lock().units.iter().find(|u| u.unit_id == unit_id).cloned()
  }

  pub fn available_units(&self, at: Option<Coordinates>) -> Vec<RankedUnit> {
    rank_available_units(&self.lock().units, at)
  }

  pub fn nearby_responders(&self, at: Coordinates, radius_m: f64) -> Vec<RankedResponder> {
    self.matcher.nearby_responders(at, radius_m)
  }

  pub fn counts(&self) -> CaseCounts {
    let inner = self.lock();
    let mut counts = CaseCounts::default();
    for case in &inner.cases {
      match case.status {
        CaseStatus::Active => counts.active += 1,
        CaseStatus::Acknowledged => counts.acknowledged += 1,
        CaseStatus::Dispatched => counts.dispatched += 1,
        CaseStatus::Resolved => counts.resolved += 1,
      }
    }
    counts
  }
}

// ─── Locked helpers ──────────────────────────────────────────────────────────

fn find_case(cases: &mut VecDeque<Case>, case_id: Uuid) -> Result<&mut Case> {
  cases
    .iter_mut()
    .find(|c| c.case_id == case_id)
    .ok_or(Error::CaseNotFound(case_id))
}

fn find_unit(units: &mut [ResponseUnit], unit_id: Uuid) -> Result<&mut ResponseUnit> {
  units
    .iter_mut()
    .find(|u| u.unit_id == unit_id)
    .ok_or(Error::UnitNotFound(unit_id))
}

/// Commit both sides of a dispatch, guards first so a failure leaves
/// nothing half-written: the case guard is checked before the unit is
/// touched, and the case transition runs only after the unit accepted the
/// assignment.
fn dispatch_locked(inner: &mut Inner, case_id: Uuid, unit_id: Uuid) -> Result<Case> {
  let Inner { cases, units } = inner;
  let case = find_case(cases, case_id)?;

  match case.status {
    CaseStatus::Active | CaseStatus::Acknowledged => {}
    from => {
      return Err(Error::InvalidTransition { case: case_id, from, action: "dispatch" });
    }
  }

  let unit = find_unit(units, unit_id)?;
  let distance = geo::distance_m(unit.location.coordinates, case.location.coordinates);
  unit.assign(case_id, geo::eta_minutes(distance))?;
  debug_assert_eq!(unit.status, UnitStatus::Dispatched);

  case.mark_dispatched()?;
  tracing::info!(case = %case_id, unit = %unit_id, "unit dispatched");
  Ok(case.clone())
}
