//! Standings aggregation engine.
//!
//! Computes derived championship data from a season's race results:
//! - Driver and constructor standings as of any round
//! - Each driver's current team, inferred from race chronology
//! - Standings after every round and per-competitor position history
//!
//! Everything here is a pure function of its input. Callers hand over the
//! complete, already-fetched result set; a set containing any malformed row
//! is rejected as a whole.

mod progressive;
mod standings;
mod teams;
mod validate;

pub use progressive::*;
pub use standings::*;
pub use teams::*;
pub use validate::*;

use thiserror::Error;

use crate::models::{DriverId, RaceId};

/// Errors raised while aggregating results.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AggregateError {
    #[error("Invalid result at index {index} (race {race_id}, driver {driver_id}): {reason}")]
    InvalidInput {
        index: usize,
        race_id: RaceId,
        driver_id: DriverId,
        reason: InvalidReason,
    },
}

/// Why a result row was rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidReason {
    #[error("points must not be negative (got {0})")]
    NegativePoints(f64),

    #[error("points must be a finite number")]
    NonFinitePoints,

    #[error("round must be 1 or greater (got {0})")]
    NonPositiveRound(i64),

    #[error("round {0} is out of range")]
    RoundOutOfRange(i64),

    #[error("unparseable race date '{0}'")]
    BadDate(String),

    #[error("driver already has a result for this race (first seen at index {first_index})")]
    DuplicateResult { first_index: usize },

    #[error("race conflicts with an earlier row on round or date (first seen at index {first_index})")]
    InconsistentRace { first_index: usize },
}

impl AggregateError {
    /// The rejection reason.
    pub fn reason(&self) -> &InvalidReason {
        match self {
            AggregateError::InvalidInput { reason, .. } => reason,
        }
    }
}
