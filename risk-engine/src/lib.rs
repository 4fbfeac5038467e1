//! Risk Engine for transaction fraud screening
//!
//! Deterministic rule-based scoring of a transaction snapshot into a bounded
//! risk score, a decision status and a per-factor explanation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;
pub mod scoring;

pub use error::{Error, Result};
pub use types::*;
pub use scoring::RiskScorer;
