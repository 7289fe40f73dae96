//! Season import pipeline.
//!
//! Drains the results provider for one season, checks the complete set
//! with the aggregator's validation and replaces the stored season file.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::calculate::{max_round, validate_results, AggregateError};
use crate::fetch::{FetchError, ResultsProvider};
use crate::storage::{write_season_results, StorageConfig, StorageError};

/// Errors that can occur during import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Provider returned invalid results: {0}")]
    Invalid(#[from] AggregateError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Outcome of a successful import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub season: i32,
    pub results: usize,
    pub rounds: u32,
    pub imported_at: DateTime<Utc>,
}

/// Fetch every result of `season` and store it.
///
/// The stored file is only replaced once the whole season has been fetched
/// and validated; a failure leaves the previous copy untouched.
pub async fn import_season(
    provider: &ResultsProvider,
    storage: &StorageConfig,
    season: i32,
) -> Result<ImportSummary, ImportError> {
    info!("Importing season {}", season);

    let results = provider.fetch_season_results(season).await?;

    let rounds = match validate_results(&results) {
        Ok(valid) => max_round(&valid).unwrap_or(0),
        Err(e) => {
            error!("Season {} rejected: {}", season, e);
            return Err(e.into());
        }
    };

    let written = write_season_results(storage, season, &results)?;
    info!(
        "Stored {} results over {} rounds for season {}",
        written, rounds, season
    );

    Ok(ImportSummary {
        season,
        results: written,
        rounds,
        imported_at: Utc::now(),
    })
}
