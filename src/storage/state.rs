//! Persisted season selection.

use std::fs;

use tracing::info;

use super::{StorageConfig, StorageError};
use crate::models::is_valid_season;

/// Read the saved season selection, if any.
pub fn read_selected_season(config: &StorageConfig) -> Result<Option<i32>, StorageError> {
    let path = config.selected_season_path();
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(&path)?;
    let year: i32 = raw
        .trim()
        .parse()
        .map_err(|e| StorageError::InvalidState {
            path: path.clone(),
            message: format!("'{}' is not a year: {}", raw.trim(), e),
        })?;

    if !is_valid_season(year) {
        return Err(StorageError::InvalidState {
            path,
            message: format!("{} is not a championship season", year),
        });
    }

    Ok(Some(year))
}

/// Save the season selection.
pub fn write_selected_season(config: &StorageConfig, season: i32) -> Result<(), StorageError> {
    fs::create_dir_all(config.state_dir())?;
    fs::write(config.selected_season_path(), format!("{}\n", season))?;
    info!("Selected season {}", season);
    Ok(())
}
