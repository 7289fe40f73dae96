//! Route handlers, grouped by resource.

pub mod health;
pub mod seasons;
pub mod standings;
pub mod teams;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{RaceResult, StandingMode};
use crate::storage::read_season_results;

/// The season a request targets: its own `season` parameter, else the
/// server's selected season.
pub(crate) fn requested_season(state: &AppState, season: Option<i32>) -> Result<i32, ApiError> {
    season
        .or(state.selection.map(|s| s.year))
        .ok_or_else(|| ApiError::BadRequest("season parameter is required".to_string()))
}

/// Parse the `type` parameter, defaulting to driver standings.
pub(crate) fn requested_mode(raw: Option<&str>) -> Result<StandingMode, ApiError> {
    match raw {
        None => Ok(StandingMode::Driver),
        Some(s) => s
            .parse::<StandingMode>()
            .map_err(|e| ApiError::BadRequest(e.to_string())),
    }
}

/// Load a stored season, 404 when it was never imported.
pub(crate) fn load_season(state: &AppState, season: i32) -> Result<Vec<RaceResult>, ApiError> {
    if !state.storage.results_path(season).exists() {
        return Err(ApiError::NotFound(format!("season {}", season)));
    }
    Ok(read_season_results(&state.storage, season)?)
}

/// Points as displayed by the API, one decimal place.
pub(crate) fn display_points(points: f64) -> f64 {
    (points * 10.0).round() / 10.0
}
