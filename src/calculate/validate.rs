//! Input validation for a season's result set.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate};
use tracing::debug;

use super::{AggregateError, InvalidReason};
use crate::models::{CompetitorId, RaceResult, StandingMode};

/// A result row that passed validation, with its round and date parsed.
#[derive(Debug, Clone, Copy)]
pub struct ValidResult<'a> {
    /// Position of the row in the input (discovery order)
    pub index: usize,
    pub round: u32,
    pub race_date: NaiveDate,
    pub result: &'a RaceResult,
}

impl<'a> ValidResult<'a> {
    /// The grouping key for the given championship.
    pub fn competitor(&self, mode: StandingMode) -> &'a CompetitorId {
        match mode {
            StandingMode::Driver => &self.result.driver_id,
            StandingMode::Constructor => &self.result.constructor_id,
        }
    }
}

/// Parse a feed race date.
///
/// Accepts `YYYY-MM-DD` and full RFC 3339 timestamps (date part is used).
pub fn parse_race_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Validate a complete result set.
///
/// Fails on the first malformed row; no row is ever skipped.
pub fn validate_results(results: &[RaceResult]) -> Result<Vec<ValidResult<'_>>, AggregateError> {
    let mut valid = Vec::with_capacity(results.len());
    let mut seen_entries: HashMap<(u32, &str), usize> = HashMap::new();
    let mut seen_races: HashMap<&str, (usize, u32, NaiveDate)> = HashMap::new();
    let mut seen_rounds: HashMap<u32, usize> = HashMap::new();

    for (index, result) in results.iter().enumerate() {
        let invalid = |reason: InvalidReason| AggregateError::InvalidInput {
            index,
            race_id: result.race_id.clone(),
            driver_id: result.driver_id.clone(),
            reason,
        };

        if !result.points.is_finite() {
            return Err(invalid(InvalidReason::NonFinitePoints));
        }
        if result.points < 0.0 {
            return Err(invalid(InvalidReason::NegativePoints(result.points)));
        }
        if result.round <= 0 {
            return Err(invalid(InvalidReason::NonPositiveRound(result.round)));
        }
        let round = u32::try_from(result.round)
            .map_err(|_| invalid(InvalidReason::RoundOutOfRange(result.round)))?;
        let race_date = parse_race_date(&result.race_date)
            .ok_or_else(|| invalid(InvalidReason::BadDate(result.race_date.clone())))?;

        match seen_races.get(result.race_id.as_str()) {
            Some(&(first_index, first_round, first_date))
                if first_round != round || first_date != race_date =>
            {
                return Err(invalid(InvalidReason::InconsistentRace { first_index }));
            }
            Some(_) => {}
            None => {
                // Each round is one race
                if let Some(&first_index) = seen_rounds.get(&round) {
                    return Err(invalid(InvalidReason::InconsistentRace { first_index }));
                }
                seen_rounds.insert(round, index);
                seen_races.insert(result.race_id.as_str(), (index, round, race_date));
            }
        }

        if let Some(&first_index) = seen_entries.get(&(round, result.driver_id.as_str())) {
            return Err(invalid(InvalidReason::DuplicateResult { first_index }));
        }
        seen_entries.insert((round, result.driver_id.as_str()), index);

        valid.push(ValidResult {
            index,
            round,
            race_date,
            result,
        });
    }

    debug!(
        "Validated {} results across {} races",
        valid.len(),
        seen_races.len()
    );
    Ok(valid)
}

/// Highest round present in a validated set.
pub fn max_round(valid: &[ValidResult<'_>]) -> Option<u32> {
    valid.iter().map(|r| r.round).max()
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{row, season};
    use super::*;

    #[test]
    fn test_validate_accepts_season() {
        let results = season();
        let valid = validate_results(&results).unwrap();
        assert_eq!(valid.len(), results.len());
        assert_eq!(valid[0].round, 1);
        assert_eq!(
            valid[0].race_date,
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
        assert_eq!(max_round(&valid), Some(3));
    }

    #[test]
    fn test_validate_empty() {
        let valid = validate_results(&[]).unwrap();
        assert!(valid.is_empty());
        assert_eq!(max_round(&valid), None);
    }

    #[test]
    fn test_validate_rejects_negative_points() {
        let mut results = season();
        results[5].points = -5.0;

        let err = validate_results(&results).unwrap_err();
        match err {
            AggregateError::InvalidInput {
                index,
                ref driver_id,
                ref reason,
                ..
            } => {
                assert_eq!(index, 5);
                assert_eq!(driver_id.as_str(), "perez");
                assert_eq!(reason, &InvalidReason::NegativePoints(-5.0));
            }
        }
    }

    #[test]
    fn test_validate_rejects_nan_points() {
        let results = vec![row(1, "2024-03-02", "albon", "williams", f64::NAN, 0)];
        let err = validate_results(&results).unwrap_err();
        assert_eq!(err.reason(), &InvalidReason::NonFinitePoints);
    }

    #[test]
    fn test_validate_rejects_non_positive_round() {
        let results = vec![row(0, "2024-03-02", "albon", "williams", 0.0, 0)];
        let err = validate_results(&results).unwrap_err();
        assert_eq!(err.reason(), &InvalidReason::NonPositiveRound(0));

        let results = vec![row(-2, "2024-03-02", "albon", "williams", 0.0, 0)];
        let err = validate_results(&results).unwrap_err();
        assert_eq!(err.reason(), &InvalidReason::NonPositiveRound(-2));
    }

    #[test]
    fn test_validate_rejects_huge_round() {
        let results = vec![row(i64::MAX, "2024-03-02", "albon", "williams", 0.0, 0)];
        let err = validate_results(&results).unwrap_err();
        assert_eq!(err.reason(), &InvalidReason::RoundOutOfRange(i64::MAX));
    }

    #[test]
    fn test_validate_rejects_bad_date() {
        let results = vec![
            row(1, "2024-03-02", "albon", "williams", 0.0, 0),
            row(2, "March 9th", "albon", "williams", 0.0, 0),
        ];
        let err = validate_results(&results).unwrap_err();
        assert_eq!(err.reason(), &InvalidReason::BadDate("March 9th".to_string()));
        match err {
            AggregateError::InvalidInput { index, .. } => assert_eq!(index, 1),
        }
    }

    #[test]
    fn test_validate_rejects_duplicate_driver_in_race() {
        let results = vec![
            row(1, "2024-03-02", "albon", "williams", 1.0, 10),
            row(1, "2024-03-02", "sargeant", "williams", 0.0, 0),
            row(1, "2024-03-02", "albon", "williams", 1.0, 10),
        ];
        let err = validate_results(&results).unwrap_err();
        assert_eq!(
            err.reason(),
            &InvalidReason::DuplicateResult { first_index: 0 }
        );
    }

    #[test]
    fn test_validate_rejects_inconsistent_race() {
        let results = vec![
            row(1, "2024-03-02", "albon", "williams", 0.0, 0),
            row(1, "2024-03-03", "sargeant", "williams", 0.0, 0),
        ];
        let err = validate_results(&results).unwrap_err();
        assert_eq!(
            err.reason(),
            &InvalidReason::InconsistentRace { first_index: 0 }
        );
    }

    #[test]
    fn test_validate_rejects_second_race_in_same_round() {
        let mut second = row(1, "2024-03-02", "sargeant", "williams", 0.0, 0);
        second.race_id = "2024_sprint_1".into();
        let results = vec![row(1, "2024-03-02", "albon", "williams", 0.0, 0), second];

        let err = validate_results(&results).unwrap_err();
        assert_eq!(
            err.reason(),
            &InvalidReason::InconsistentRace { first_index: 0 }
        );
        match err {
            AggregateError::InvalidInput { index, .. } => assert_eq!(index, 1),
        }
    }

    #[test]
    fn test_parse_race_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 26).unwrap();
        assert_eq!(parse_race_date("2024-05-26"), Some(expected));
        assert_eq!(parse_race_date(" 2024-05-26 "), Some(expected));
        assert_eq!(parse_race_date("2024-05-26T13:00:00Z"), Some(expected));
        assert_eq!(parse_race_date("2024-02-30"), None);
        assert_eq!(parse_race_date(""), None);
    }

    #[test]
    fn test_competitor_key_by_mode() {
        let results = season();
        let valid = validate_results(&results).unwrap();
        assert_eq!(valid[0].competitor(StandingMode::Driver).as_str(), "verstappen");
        assert_eq!(
            valid[0].competitor(StandingMode::Constructor).as_str(),
            "red_bull"
        );
    }
}
