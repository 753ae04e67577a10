//! Distance-ranked matching of responders and response units to a case.
//!
//! Rankings are recomputed per call over current state — nothing is cached,
//! so repeated queries with the same inputs are order-stable. Equal
//! distances break ties by ascending id, keeping every ordering
//! deterministic and reproducible.

use sahaaya_core::{
  geo::{self, Coordinates},
  responder::Responder,
  unit::ResponseUnit,
};
use serde::Serialize;

// ─── Ranked results ──────────────────────────────────────────────────────────

/// A responder plus its distance from the queried location.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResponder {
  pub responder:  Responder,
  pub distance_m: f64,
}

/// An available unit, distance-ranked when a case location was supplied.
#[derive(Debug, Clone, Serialize)]
pub struct RankedUnit {
  pub unit:        ResponseUnit,
  pub distance_m:  Option<f64>,
  pub eta_minutes: Option<u32>,
}

// ─── Matcher ─────────────────────────────────────────────────────────────────

/// Owns the responder roster and ranks candidates for a case location.
#[derive(Debug, Default)]
pub struct ResponderMatcher {
  roster: Vec<Responder>,
}

impl ResponderMatcher {
  pub fn new(roster: Vec<Responder>) -> Self { Self { roster } }

  /// Responders within `radius_m` of `at`, ascending by distance.
  pub fn nearby_responders(&self, at: Coordinates, radius_m: f64) -> Vec<RankedResponder> {
    let mut ranked: Vec<RankedResponder> = self
      .roster
      .iter()
      .map(|r| RankedResponder {
        responder:  r.clone(),
        distance_m: geo::distance_m(r.coordinates, at),
      })
      .filter(|r| r.distance_m <= radius_m)
      .collect();

    ranked.sort_by(|a, b| {
      a.distance_m
        .total_cmp(&b.distance_m)
        .then_with(|| a.responder.responder_id.cmp(&b.responder.responder_id))
    });
    ranked
  }
}

/// Filter `units` to `available` and rank them: ascending by distance to
/// `at` when given (with an ETA per unit), else by unit id.
pub fn rank_available_units<'a, I>(units: I, at: Option<Coordinates>) -> Vec<RankedUnit>
where
  I: IntoIterator<Item = &'a ResponseUnit>,
{
  let mut ranked: Vec<RankedUnit> = units
    .into_iter()
    .filter(|u| u.is_available())
    .map(|u| {
      let distance_m = at.map(|c| geo::distance_m(u.location.coordinates, c));
      RankedUnit {
        unit:        u.clone(),
        eta_minutes: distance_m.map(geo::eta_minutes),
        distance_m,
      }
    })
    .collect();

  ranked.sort_by(|a, b| match (a.distance_m, b.distance_m) {
    (Some(da), Some(db)) => da
      .total_cmp(&db)
      .then_with(|| a.unit.unit_id.cmp(&b.unit.unit_id)),
    _ => a.unit.unit_id.cmp(&b.unit.unit_id),
  });
  ranked
}

#[cfg(test)]
mod tests {
  use sahaaya_core::{
    geo::Location,
    responder::{ResponderKind, ResponderStatus},
    unit::UnitStatus,
  };
  use uuid::Uuid;

  use super::*;

  const CASE_AT: Coordinates = Coordinates { lat: 28.6139, lng: 77.2090 };

  fn responder(name: &str, lat: f64, lng: f64) -> Responder {
    Responder {
      responder_id: Uuid::new_v4(),
      name:         name.into(),
      kind:         ResponderKind::Volunteer,
      coordinates:  Coordinates { lat, lng },
      status:       ResponderStatus::Available,
    }
  }

  fn unit(call_sign: &str, lat: f64, lng: f64) -> ResponseUnit {
    ResponseUnit::new(call_sign, vec!["crew".into()], Location::new(lat, lng, call_sign))
  }

  #[test]
  fn responders_ranked_ascending_by_distance() {
    let matcher = ResponderMatcher::new(vec![
      responder("far", 28.6239, 77.2090),
      responder("near", 28.6142, 77.2090),
      responder("mid", 28.6180, 77.2090),
    ]);

    let ranked = matcher.nearby_responders(CASE_AT, 5_000.0);
    let names: Vec<&str> = ranked.iter().map(|r| r.responder.name.as_str()).collect();
    assert_eq!(names, ["near", "mid", "far"]);
    assert!(ranked[0].distance_m < ranked[1].distance_m);
  }

  #[test]
  fn radius_filters_out_distant_responders() {
    let matcher = ResponderMatcher::new(vec![
      responder("near", 28.6142, 77.2090),
      responder("km-away", 28.6239, 77.2090),
    ]);

    let ranked = matcher.nearby_responders(CASE_AT, 500.0);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].responder.name, "near");
  }

  #[test]
  fn ranking_is_order_stable_across_calls() {
    let matcher = ResponderMatcher::new(vec![
      responder("a", 28.6180, 77.2090),
      responder("b", 28.6142, 77.2090),
      responder("c", 28.6239, 77.2090),
    ]);

    let first = matcher.nearby_responders(CASE_AT, 5_000.0);
    let second = matcher.nearby_responders(CASE_AT, 5_000.0);

    let ids = |v: &[RankedResponder]| {
      v.iter().map(|r| r.responder.responder_id).collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
  }

  #[test]
  fn equal_distances_break_ties_by_id() {
    // Two responders at the identical spot; order must follow ids.
    let mut a = responder("a", 28.6180, 77.2090);
    let mut b = responder("b", 28.6180, 77.2090);
    if a.responder_id > b.responder_id {
      std::mem::swap(&mut a, &mut b);
    }
    let low_id = a.responder_id;

    let matcher = ResponderMatcher::new(vec![b, a]);
    let ranked = matcher.nearby_responders(CASE_AT, 5_000.0);
    assert_eq!(ranked[0].responder.responder_id, low_id);
  }

  #[test]
  fn only_available_units_are_ranked() {
    let available = unit("PCR-1", 28.6142, 77.2090);
    let mut busy = unit("PCR-2", 28.6139, 77.2090);
    busy.assign(Uuid::new_v4(), 1).unwrap();

    let pool = [available.clone(), busy];
    let ranked = rank_available_units(&pool, Some(CASE_AT));

    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].unit.unit_id, available.unit_id);
    assert_eq!(ranked[0].unit.status, UnitStatus::Available);
  }

  #[test]
  fn units_ranked_by_distance_with_eta() {
    let near = unit("PCR-1", 28.6142, 77.2090);
    let far = unit("PCR-2", 28.6439, 77.2090);

    let pool = [far.clone(), near.clone()];
    let ranked = rank_available_units(&pool, Some(CASE_AT));

    assert_eq!(ranked[0].unit.unit_id, near.unit_id);
    assert_eq!(ranked[1].unit.unit_id, far.unit_id);
    assert!(ranked[0].eta_minutes.unwrap() <= ranked[1].eta_minutes.unwrap());
  }

  #[test]
  fn without_location_units_order_by_id() {
    let mut pool = vec![
      unit("PCR-1", 28.6142, 77.2090),
      unit("PCR-2", 28.6439, 77.2090),
      unit("PCR-3", 28.6239, 77.2090),
    ];
    pool.sort_by_key(|u| u.unit_id);
    let expected: Vec<Uuid> = pool.iter().map(|u| u.unit_id).collect();

    pool.reverse();
    let ranked = rank_available_units(&pool, None);
    let got: Vec<Uuid> = ranked.iter().map(|r| r.unit.unit_id).collect();

    assert_eq!(got, expected);
    assert!(ranked.iter().all(|r| r.distance_m.is_none() && r.eta_minutes.is_none()));
  }
}
