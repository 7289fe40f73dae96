use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::SeasonSelection;
use crate::storage;

#[derive(Debug, Serialize)]
pub struct SeasonsResponse {
    /// Seasons present in the store, oldest first
    pub seasons: Vec<i32>,
    pub selected: Option<SeasonSelection>,
}

pub async fn list_seasons(State(state): State<AppState>) -> Result<Json<SeasonsResponse>, ApiError> {
    Ok(Json(SeasonsResponse {
        seasons: storage::list_seasons(&state.storage)?,
        selected: state.selection,
    }))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get_json, test_app};
    use axum::http::StatusCode;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_list_seasons() {
        let temp_dir = TempDir::new().unwrap();
        let (status, json) = get_json(test_app(&temp_dir, Some(2024)), "/api/v1/seasons").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["seasons"], json!([2024]));
        assert_eq!(json["selected"], json!({"year": 2024, "source": "explicit"}));
    }

    #[tokio::test]
    async fn test_list_seasons_without_selection() {
        let temp_dir = TempDir::new().unwrap();
        let (_, json) = get_json(test_app(&temp_dir, None), "/api/v1/seasons").await;
        assert_eq!(json["selected"], serde_json::Value::Null);
    }
}
