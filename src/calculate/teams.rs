//! Driver-to-team attribution from race chronology.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use super::standings::aggregate;
use super::{max_round, validate_results, AggregateError, RoundFilter, ValidResult};
use crate::models::{ConstructorId, DriverId, DriverStanding, RaceResult, StandingMode};

/// Map each driver to the constructor of their most recent race.
///
/// "Most recent" is the latest race date; equal dates fall back to the
/// higher round, and a complete tie keeps the row seen first.
pub fn compute_driver_team_assignments(
    results: &[RaceResult],
) -> Result<BTreeMap<DriverId, ConstructorId>, AggregateError> {
    let valid = validate_results(results)?;
    Ok(assignments(&valid, RoundFilter::SeasonTotal))
}

/// Team assignments considering only rounds up to `round` (0 = all).
pub fn driver_team_assignments_at_round(
    results: &[RaceResult],
    round: u32,
) -> Result<BTreeMap<DriverId, ConstructorId>, AggregateError> {
    let valid = validate_results(results)?;
    let filter = RoundFilter::from_round(round).normalize(max_round(&valid));
    Ok(assignments(&valid, filter))
}

/// Driver standings as of `round`, each row carrying the driver's team at
/// that point of the season.
pub fn compute_driver_standings_with_teams(
    results: &[RaceResult],
    round: u32,
) -> Result<Vec<DriverStanding>, AggregateError> {
    let valid = validate_results(results)?;
    let filter = RoundFilter::from_round(round).normalize(max_round(&valid));
    let mut teams = assignments(&valid, filter);

    Ok(aggregate(&valid, filter, StandingMode::Driver)
        .into_iter()
        .map(|entry| {
            let constructor_id = teams.remove(&entry.competitor_id);
            DriverStanding {
                entry,
                constructor_id,
            }
        })
        .collect())
}

pub(crate) fn assignments(
    valid: &[ValidResult<'_>],
    filter: RoundFilter,
) -> BTreeMap<DriverId, ConstructorId> {
    let mut latest: HashMap<&str, &ValidResult<'_>> = HashMap::new();

    for row in valid.iter().filter(|r| filter.includes(r.round)) {
        match latest.entry(row.result.driver_id.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
            Entry::Occupied(mut slot) => {
                if is_more_recent(row, slot.get()) {
                    slot.insert(row);
                }
            }
        }
    }

    latest
        .into_values()
        .map(|row| {
            (
                row.result.driver_id.clone(),
                row.result.constructor_id.clone(),
            )
        })
        .collect()
}

/// Later date wins, then higher round; on a full tie the lower input index.
fn is_more_recent(candidate: &ValidResult<'_>, current: &ValidResult<'_>) -> bool {
    (candidate.race_date, candidate.round)
        .cmp(&(current.race_date, current.round))
        .then_with(|| current.index.cmp(&candidate.index))
        == Ordering::Greater
}
