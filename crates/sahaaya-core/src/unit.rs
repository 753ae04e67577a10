//! ResponseUnit — a dispatchable patrol crew with its own status machine.
//!
//! `available → dispatched → on-scene → returning → available`. The unit
//! holds an assigned case id only while `dispatched` or `on-scene`; leaving
//! those states clears the assignment.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, geo::Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitStatus {
  Available,
  Dispatched,
  OnScene,
  Returning,
}

impl fmt::Display for UnitStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Available => "available",
      Self::Dispatched => "dispatched",
      Self::OnScene => "on-scene",
      Self::Returning => "returning",
    };
    f.write_str(s)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseUnit {
  pub unit_id:          Uuid,
  /// Vehicle number or radio call sign, e.g. "PCR-12".
  pub call_sign:        String,
  pub crew:             Vec<String>,
  /// Home or last-reported position.
  pub location:         Location,
  pub status:           UnitStatus,
  pub assigned_case_id: Option<Uuid>,
  /// Estimated minutes to the assigned case; set at dispatch time.
  pub eta_minutes:      Option<u32>,
}

impl ResponseUnit {
  pub fn new(call_sign: impl Into<String>, crew: Vec<String>, location: Location) -> Self {
    Self {
      unit_id: Uuid::new_v4(),
      call_sign: call_sign.into(),
      crew,
      location,
      status: UnitStatus::Available,
      assigned_case_id: None,
      eta_minutes: None,
    }
  }

  pub fn is_available(&self) -> bool { self.status == UnitStatus::Available }

  /// `available → dispatched`, binding the unit to `case_id`.
  ///
  /// A unit that lost the race for dispatch (or a stale reference) reports
  /// [`Error::UnitUnavailable`]; the caller should re-query the pool.
  pub fn assign(&mut self, case_id: Uuid, eta_minutes: u32) -> Result<()> {
    if !self.is_available() {
      return Err(Error::UnitUnavailable {
        unit:   self.unit_id,
        status: self.status,
      });
    }
    self.status = UnitStatus::Dispatched;
    self.assigned_case_id = Some(case_id);
    self.eta_minutes = Some(eta_minutes);
    Ok(())
  }

  /// `dispatched → on-scene`.
  pub fn mark_on_scene(&mut self) -> Result<()> {
    if self.status != UnitStatus::Dispatched {
      return Err(Error::InvalidUnitTransition {
        unit:   self.unit_id,
        from:   self.status,
        action: "arrive on scene",
      });
    }
    self.status = UnitStatus::OnScene;
    Ok(())
  }

  /// `{dispatched, on-scene} → returning`, clearing the assignment.
  pub fn release(&mut self) -> Result<()> {
    match self.status {
      UnitStatus::Dispatched | UnitStatus::OnScene => {
        self.status = UnitStatus::Returning;
        self.assigned_case_id = None;
        self.eta_minutes = None;
        Ok(())
      }
      from => Err(Error::InvalidUnitTransition {
        unit: self.unit_id,
        from,
        action: "release",
      }),
    }
  }

  /// `returning → available` — the explicit end of the recovery window.
  pub fn recover(&mut self) -> Result<()> {
    if self.status != UnitStatus::Returning {
      return Err(Error::InvalidUnitTransition {
        unit:   self.unit_id,
        from:   self.status,
        action: "recover",
      });
    }
    self.status = UnitStatus::Available;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn unit() -> ResponseUnit {
    ResponseUnit::new(
      "PCR-12",
      vec!["Insp. Sharma".into(), "Const. Verma".into()],
      Location::new(28.6139, 77.2090, "CP Outer Circle"),
    )
  }

  #[test]
  fn full_patrol_cycle() {
    let mut u = unit();
    let case_id = Uuid::new_v4();

    u.assign(case_id, 4).unwrap();
    assert_eq!(u.status, UnitStatus::Dispatched);
    assert_eq!(u.assigned_case_id, Some(case_id));
    assert_eq!(u.eta_minutes, Some(4));

    u.mark_on_scene().unwrap();
    assert_eq!(u.status, UnitStatus::OnScene);
    assert_eq!(u.assigned_case_id, Some(case_id));

    u.release().unwrap();
    assert_eq!(u.status, UnitStatus::Returning);
    assert_eq!(u.assigned_case_id, None);
    assert_eq!(u.eta_minutes, None);

    u.recover().unwrap();
    assert!(u.is_available());
  }

  #[test]
  fn assign_while_dispatched_is_unavailable() {
    let mut u = unit();
    u.assign(Uuid::new_v4(), 2).unwrap();

    let err = u.assign(Uuid::new_v4(), 2).unwrap_err();
    assert!(matches!(err, Error::UnitUnavailable { status: UnitStatus::Dispatched, .. }));
  }

  #[test]
  fn assignment_only_while_dispatched_or_on_scene() {
    let mut u = unit();
    assert_eq!(u.assigned_case_id, None);

    u.assign(Uuid::new_v4(), 3).unwrap();
    assert!(u.assigned_case_id.is_some());

    u.release().unwrap();
    assert_eq!(u.assigned_case_id, None);

    u.recover().unwrap();
    assert_eq!(u.assigned_case_id, None);
  }

  #[test]
  fn recover_requires_returning() {
    let mut u = unit();
    let err = u.recover().unwrap_err();
    assert!(matches!(err, Error::InvalidUnitTransition { from: UnitStatus::Available, .. }));
  }

  #[test]
  fn on_scene_requires_dispatched() {
    let mut u = unit();
    assert!(u.mark_on_scene().is_err());
  }
}
