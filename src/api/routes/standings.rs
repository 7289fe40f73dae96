use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{display_points, load_season, requested_mode, requested_season};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{
    compute_driver_standings_with_teams, compute_standings, position_history as history_for,
};
use crate::models::{CompetitorId, ConstructorId, PositionHistoryPoint, StandingMode};

#[derive(Debug, Deserialize)]
pub struct ProgressiveParams {
    pub season: Option<i32>,
    /// 0 or absent = season total
    pub round: Option<u32>,
    #[serde(rename = "type")]
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StandingRow {
    pub position: u32,
    pub competitor_id: CompetitorId,
    pub points: f64,
    pub wins: u32,
    pub races: u32,
    /// Driver's team as of the requested round (driver standings only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constructor_id: Option<ConstructorId>,
}

#[derive(Debug, Serialize)]
pub struct ProgressiveResponse {
    pub season: i32,
    pub round: u32,
    #[serde(rename = "type")]
    pub mode: StandingMode,
    pub standings: Vec<StandingRow>,
}

pub async fn progressive_standings(
    State(state): State<AppState>,
    params: Result<Query<ProgressiveParams>, QueryRejection>,
) -> Result<Json<ProgressiveResponse>, ApiError> {
    let Query(params) = params?;
    let season = requested_season(&state, params.season)?;
    let mode = requested_mode(params.mode.as_deref())?;
    let round = params.round.unwrap_or(0);

    let results = load_season(&state, season)?;
    debug!(
        "Computing {} standings for season {} round {} over {} results",
        mode,
        season,
        round,
        results.len()
    );

    let standings = match mode {
        StandingMode::Driver => compute_driver_standings_with_teams(&results, round)?
            .into_iter()
            .map(|s| StandingRow {
                position: s.entry.position,
                competitor_id: s.entry.competitor_id,
                points: display_points(s.entry.points),
                wins: s.entry.wins,
                races: s.entry.races,
                constructor_id: s.constructor_id,
            })
            .collect(),
        StandingMode::Constructor => compute_standings(&results, round, mode)?
            .into_iter()
            .map(|e| StandingRow {
                position: e.position,
                competitor_id: e.competitor_id,
                points: display_points(e.points),
                wins: e.wins,
                races: e.races,
                constructor_id: None,
            })
            .collect(),
    };

    Ok(Json(ProgressiveResponse {
        season,
        round,
        mode,
        standings,
    }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub season: Option<i32>,
    #[serde(rename = "type")]
    pub mode: Option<String>,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub season: i32,
    #[serde(rename = "type")]
    pub mode: StandingMode,
    pub competitor_id: String,
    pub history: Vec<PositionHistoryPoint>,
}

pub async fn position_history(
    State(state): State<AppState>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let Query(params) = params?;
    let season = requested_season(&state, params.season)?;
    let mode = requested_mode(params.mode.as_deref())?;

    let results = load_season(&state, season)?;
    let history: Vec<PositionHistoryPoint> = history_for(&results, mode, &params.id)?
        .into_iter()
        .map(|p| PositionHistoryPoint {
            points: display_points(p.points),
            ..p
        })
        .collect();

    if history.is_empty() {
        return Err(ApiError::NotFound(format!(
            "{} '{}' in season {}",
            mode, params.id, season
        )));
    }

    Ok(Json(HistoryResponse {
        season,
        mode,
        competitor_id: params.id,
        history,
    }))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get_json, test_app};
    use crate::calculate::fixtures::row;
    use crate::models::RaceResult;
    use crate::storage::{write_season_results, StorageConfig};
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn ids_and_points(json: &Value) -> Vec<(String, f64)> {
        json["standings"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| {
                (
                    r["competitor_id"].as_str().unwrap().to_string(),
                    r["points"].as_f64().unwrap(),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_driver_season_total() {
        let temp_dir = TempDir::new().unwrap();
        let (status, json) = get_json(
            test_app(&temp_dir, None),
            "/api/v1/standings/progressive?season=2024",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["season"], 2024);
        assert_eq!(json["round"], 0);
        assert_eq!(json["type"], "driver");
        assert_eq!(
            ids_and_points(&json),
            vec![
                ("verstappen".to_string(), 52.0),
                ("leclerc".to_string(), 46.0),
                ("sainz".to_string(), 40.0),
                ("perez".to_string(), 36.0),
                ("bearman".to_string(), 6.0),
            ]
        );

        let leader = &json["standings"][0];
        assert_eq!(leader["position"], 1);
        assert_eq!(leader["wins"], 2);
        assert_eq!(leader["races"], 3);
        assert_eq!(leader["constructor_id"], "red_bull");
        assert_eq!(json["standings"][4]["constructor_id"], "haas");
    }

    #[tokio::test]
    async fn test_driver_team_follows_round() {
        let temp_dir = TempDir::new().unwrap();
        let (_, json) = get_json(
            test_app(&temp_dir, Some(2024)),
            "/api/v1/standings/progressive?round=2",
        )
        .await;

        assert_eq!(json["round"], 2);
        assert_eq!(
            ids_and_points(&json),
            vec![
                ("verstappen".to_string(), 52.0),
                ("perez".to_string(), 36.0),
                ("leclerc".to_string(), 27.0),
                ("sainz".to_string(), 15.0),
                ("bearman".to_string(), 6.0),
            ]
        );
        assert_eq!(json["standings"][4]["constructor_id"], "ferrari");
    }

    #[tokio::test]
    async fn test_constructor_standings() {
        let temp_dir = TempDir::new().unwrap();
        let (status, json) = get_json(
            test_app(&temp_dir, None),
            "/api/v1/standings/progressive?season=2024&type=constructor",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["type"], "constructor");
        assert_eq!(
            ids_and_points(&json),
            vec![
                ("ferrari".to_string(), 92.0),
                ("red_bull".to_string(), 88.0),
                ("haas".to_string(), 0.0),
            ]
        );
        assert!(json["standings"][0].get("constructor_id").is_none());
    }

    #[tokio::test]
    async fn test_bad_queries() {
        let temp_dir = TempDir::new().unwrap();

        let (status, json) = get_json(
            test_app(&temp_dir, None),
            "/api/v1/standings/progressive?season=2024&round=abc",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");

        let (status, _) = get_json(
            test_app(&temp_dir, None),
            "/api/v1/standings/progressive?season=2024&type=pitcrew",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) =
            get_json(test_app(&temp_dir, None), "/api/v1/standings/progressive").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["error"]["message"],
            "Bad request: season parameter is required"
        );
    }

    #[tokio::test]
    async fn test_unknown_season_is_404() {
        let temp_dir = TempDir::new().unwrap();
        let (status, json) = get_json(
            test_app(&temp_dir, None),
            "/api/v1/standings/progressive?season=1999",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_invalid_stored_results_are_422() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&temp_dir, None);
        let storage = StorageConfig::new(temp_dir.path().to_path_buf());
        let rows: Vec<RaceResult> = vec![row(1, "2025-03-16", "norris", "mclaren", -25.0, 1)];
        write_season_results(&storage, 2025, &rows).unwrap();

        let (status, json) = get_json(app, "/api/v1/standings/progressive?season=2025").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_position_history() {
        let temp_dir = TempDir::new().unwrap();
        let (status, json) = get_json(
            test_app(&temp_dir, None),
            "/api/v1/standings/history?season=2024&id=leclerc",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["competitor_id"], "leclerc");
        assert_eq!(
            json["history"],
            json!([
                {"round": 1, "position": 4, "points": 12.0, "wins": 0},
                {"round": 2, "position": 3, "points": 27.0, "wins": 0},
                {"round": 3, "position": 2, "points": 46.0, "wins": 0}
            ])
        );
    }

    #[tokio::test]
    async fn test_position_history_errors() {
        let temp_dir = TempDir::new().unwrap();

        let (status, _) = get_json(
            test_app(&temp_dir, None),
            "/api/v1/standings/history?season=2024&id=senna",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_json(
            test_app(&temp_dir, None),
            "/api/v1/standings/history?season=2024",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
