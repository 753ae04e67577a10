//! Core types and state machines for the Sahaaya dispatch engine.
//!
//! This crate is deliberately free of async and I/O dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod case;
pub mod error;
pub mod geo;
pub mod responder;
pub mod unit;

pub use error::{Error, Result};
