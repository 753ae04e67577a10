//! The Sahaaya dispatch engine.
//!
//! Wires the covert-trigger detector, the connectivity classifier, the
//! responder matcher, and the dispatch coordinator into one in-process
//! pipeline:
//!
//! ```text
//! TriggerDetector ─(activation)→ ConnectivityClassifier ─→
//!   DispatchCoordinator::create_case ─→ ResponderMatcher suggestion
//! ```
//!
//! All coordinator state lives in memory behind a single lock; the
//! surrounding application renders snapshots and never holds live references.

pub mod connectivity;
pub mod coordinator;
pub mod matcher;
pub mod session;
pub mod trigger;

pub use connectivity::{Classifier, ConnectivityClassifier, FixedClassifier, TcpProbeClassifier};
pub use coordinator::{CaseCounts, CaseCreated, CoordinatorConfig, DispatchCoordinator};
pub use matcher::{RankedResponder, RankedUnit, ResponderMatcher};
pub use session::{AlertContext, AlertSession};
pub use trigger::{Activation, TriggerConfig, TriggerDetector};
