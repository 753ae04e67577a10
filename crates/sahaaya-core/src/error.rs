//! Error types for `sahaaya-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::{case::CaseStatus, unit::UnitStatus};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
  #[error("case not found: {0}")]
  CaseNotFound(Uuid),

  #[error("unit not found: {0}")]
  UnitNotFound(Uuid),

  #[error("case {case} is {from}, cannot {action}")]
  InvalidTransition {
    case:   Uuid,
    from:   CaseStatus,
    action: &'static str,
  },

  #[error("unit {unit} is {from}, cannot {action}")]
  InvalidUnitTransition {
    unit:   Uuid,
    from:   UnitStatus,
    action: &'static str,
  },

  #[error("unit {unit} is {status}, not available for dispatch")]
  UnitUnavailable { unit: Uuid, status: UnitStatus },

  #[error("no units available for dispatch")]
  NoUnitsAvailable,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
