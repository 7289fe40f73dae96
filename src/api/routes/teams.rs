use std::collections::BTreeMap;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{load_season, requested_season};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::driver_team_assignments_at_round;
use crate::models::{ConstructorId, DriverId};

#[derive(Debug, Deserialize)]
pub struct TeamsParams {
    pub season: Option<i32>,
    pub round: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct TeamsResponse {
    pub season: i32,
    pub round: u32,
    pub teams: BTreeMap<DriverId, ConstructorId>,
}

pub async fn team_assignments(
    State(state): State<AppState>,
    params: Result<Query<TeamsParams>, QueryRejection>,
) -> Result<Json<TeamsResponse>, ApiError> {
    let Query(params) = params?;
    let season = requested_season(&state, params.season)?;
    let round = params.round.unwrap_or(0);

    let results = load_season(&state, season)?;
    let teams = driver_team_assignments_at_round(&results, round)?;

    Ok(Json(TeamsResponse {
        season,
        round,
        teams,
    }))
}
