//! Standings after every round, and per-competitor position history.

use std::collections::BTreeSet;

use super::standings::aggregate;
use super::{validate_results, AggregateError, RoundFilter};
use crate::models::{PositionHistoryPoint, RaceResult, RoundStandings, StandingMode};

/// Compute the standings table after each round present in the data.
///
/// Tables are returned in round order; the last one is the season total.
/// Each table is computed from scratch over the full validated set.
pub fn compute_progressive_standings(
    results: &[RaceResult],
    mode: StandingMode,
) -> Result<Vec<RoundStandings>, AggregateError> {
    let valid = validate_results(results)?;
    let rounds: BTreeSet<u32> = valid.iter().map(|r| r.round).collect();

    Ok(rounds
        .into_iter()
        .map(|round| RoundStandings {
            round,
            mode,
            standings: aggregate(&valid, RoundFilter::UpTo(round), mode),
        })
        .collect())
}

/// A competitor's championship position after each round.
///
/// Rounds before the competitor's first result are omitted.
pub fn position_history(
    results: &[RaceResult],
    mode: StandingMode,
    competitor_id: &str,
) -> Result<Vec<PositionHistoryPoint>, AggregateError> {
    Ok(compute_progressive_standings(results, mode)?
        .iter()
        .filter_map(|table| {
            table
                .entry_for(competitor_id)
                .map(|entry| PositionHistoryPoint {
                    round: table.round,
                    position: entry.position,
                    points: entry.points,
                    wins: entry.wins,
                })
        })
        .collect())
}
