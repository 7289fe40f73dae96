//! Derived championship standings models.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{CompetitorId, ConstructorId};

/// Which championship to aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StandingMode {
    #[default]
    Driver,
    Constructor,
}

impl std::fmt::Display for StandingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StandingMode::Driver => write!(f, "driver"),
            StandingMode::Constructor => write!(f, "constructor"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown standing type '{0}' (expected 'driver' or 'constructor')")]
pub struct UnknownStandingMode(pub String);

impl FromStr for StandingMode {
    type Err = UnknownStandingMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driver" | "drivers" => Ok(StandingMode::Driver),
            "constructor" | "constructors" | "team" | "teams" => Ok(StandingMode::Constructor),
            other => Err(UnknownStandingMode(other.to_string())),
        }
    }
}

/// One competitor's aggregate state as of a round.
///
/// Never persisted on its own; recomputed on every aggregation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingEntry {
    /// Championship position (1 = leader)
    pub position: u32,

    /// Driver or constructor, depending on mode
    pub competitor_id: CompetitorId,

    /// Sum of points up to and including the round
    pub points: f64,

    /// Number of race wins
    pub wins: u32,

    /// Number of races with at least one result row
    pub races: u32,
}

/// A driver standing with the driver's team as of the same round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverStanding {
    #[serde(flatten)]
    pub entry: StandingEntry,

    /// Constructor of the driver's latest race (None if unknown)
    pub constructor_id: Option<ConstructorId>,
}

/// Standings after a specific round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundStandings {
    pub round: u32,
    pub mode: StandingMode,
    pub standings: Vec<StandingEntry>,
}

impl RoundStandings {
    /// Get a competitor's entry in this round.
    pub fn entry_for(&self, competitor_id: &str) -> Option<&StandingEntry> {
        self.standings
            .iter()
            .find(|e| e.competitor_id.as_str() == competitor_id)
    }
}

/// A competitor's championship position after one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionHistoryPoint {
    pub round: u32,
    pub position: u32,
    pub points: f64,
    pub wins: u32,
}
