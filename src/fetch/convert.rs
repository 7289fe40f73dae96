//! Feed row shapes and their conversion into [`RaceResult`].

use serde::Deserialize;

use super::FetchError;
use crate::models::{RaceResult, ResultStatus};

/// Race as nested in a result row.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRace {
    pub race_id: String,
    pub season: i32,
    pub round: i64,
    pub date: String,
    #[serde(default)]
    pub race_name: Option<String>,
}

/// Driver as nested in a result row.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiDriver {
    pub driver_id: String,
}

/// Constructor as nested in a result row.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConstructor {
    pub constructor_id: String,
}

/// One row of the `/results/` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResult {
    pub race: ApiRace,
    pub driver: ApiDriver,
    pub constructor: ApiConstructor,
    #[serde(default)]
    pub final_position: Option<u32>,
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub status: ResultStatus,
}

/// One row of the `/seasons/` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSeason {
    pub year: i32,
    #[serde(default)]
    pub is_active: bool,
}

impl From<ApiResult> for RaceResult {
    fn from(row: ApiResult) -> Self {
        let result = RaceResult::new(
            row.race.race_id.into(),
            row.race.date,
            row.race.round,
            row.driver.driver_id.into(),
            row.constructor.constructor_id.into(),
        )
        .with_points(row.points)
        .with_status(row.status);

        match row.final_position {
            Some(position) => result.with_position(position),
            None => result,
        }
    }
}

/// Convert feed rows for `season`, rejecting rows that belong to another season.
///
/// Values are carried over as delivered; range and date checks happen in
/// the aggregator.
pub fn convert_results(season: i32, rows: Vec<ApiResult>) -> Result<Vec<RaceResult>, FetchError> {
    rows.into_iter()
        .map(|row| {
            if row.race.season != season {
                return Err(FetchError::SeasonMismatch {
                    expected: season,
                    found: row.race.season,
                });
            }
            Ok(RaceResult::from(row))
        })
        .collect()
}

/// Pick the season flagged active, falling back to the latest one listed.
pub fn pick_active_season(seasons: &[ApiSeason]) -> Option<i32> {
    seasons
        .iter()
        .find(|s| s.is_active)
        .or_else(|| seasons.iter().max_by_key(|s| s.year))
        .map(|s| s.year)
}
