//! Championship standings as of a round.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::{max_round, validate_results, AggregateError, ValidResult};
use crate::models::{CompetitorId, RaceResult, StandingEntry, StandingMode};

/// Which rounds of a season count towards a standings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundFilter {
    /// Every round in the data
    SeasonTotal,
    /// Rounds `1..=n`
    UpTo(u32),
}

impl RoundFilter {
    /// Round 0 means the season total.
    pub fn from_round(round: u32) -> Self {
        if round == 0 {
            RoundFilter::SeasonTotal
        } else {
            RoundFilter::UpTo(round)
        }
    }

    /// Check whether a round counts.
    pub fn includes(&self, round: u32) -> bool {
        match self {
            RoundFilter::SeasonTotal => true,
            RoundFilter::UpTo(limit) => round <= *limit,
        }
    }

    /// A round at or past the last round in the data is the season total.
    pub fn normalize(self, max_round: Option<u32>) -> Self {
        match (self, max_round) {
            (RoundFilter::UpTo(limit), Some(max)) if limit >= max => {
                if limit > max {
                    debug!(
                        "Round {} is beyond the last round in the data ({}), using season total",
                        limit, max
                    );
                }
                RoundFilter::SeasonTotal
            }
            (filter, _) => filter,
        }
    }
}

/// Compute ranked standings as of `round` (0 = season total).
///
/// Rows after `round` are ignored. An empty input, or one with no rows in
/// range, yields an empty table.
pub fn compute_standings(
    results: &[RaceResult],
    round: u32,
    mode: StandingMode,
) -> Result<Vec<StandingEntry>, AggregateError> {
    let valid = validate_results(results)?;
    let filter = RoundFilter::from_round(round).normalize(max_round(&valid));
    Ok(aggregate(&valid, filter, mode))
}

struct Tally<'a> {
    competitor_id: &'a CompetitorId,
    points: f64,
    wins: u32,
    races: HashSet<&'a str>,
}

/// Sum and rank validated results.
pub(crate) fn aggregate(
    valid: &[ValidResult<'_>],
    filter: RoundFilter,
    mode: StandingMode,
) -> Vec<StandingEntry> {
    let mut tallies: Vec<Tally<'_>> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for row in valid.iter().filter(|r| filter.includes(r.round)) {
        let competitor_id = row.competitor(mode);
        let slot = *slots.entry(competitor_id.as_str()).or_insert_with(|| {
            tallies.push(Tally {
                competitor_id,
                points: 0.0,
                wins: 0,
                races: HashSet::new(),
            });
            tallies.len() - 1
        });

        let tally = &mut tallies[slot];
        tally.points += row.result.points;
        if row.result.is_win() {
            tally.wins += 1;
        }
        tally.races.insert(row.result.race_id.as_str());
    }

    rank(tallies)
}

/// Order by points desc, then wins desc; remaining ties keep discovery order.
fn rank(mut tallies: Vec<Tally<'_>>) -> Vec<StandingEntry> {
    // sort_by is stable, which is what keeps full ties in discovery order
    tallies.sort_by(|a, b| {
        b.points
            .total_cmp(&a.points)
            .then_with(|| b.wins.cmp(&a.wins))
    });

    tallies
        .into_iter()
        .enumerate()
        .map(|(i, t)| StandingEntry {
            position: i as u32 + 1,
            competitor_id: t.competitor_id.clone(),
            points: t.points,
            wins: t.wins,
            races: t.races.len() as u32,
        })
        .collect()
}
