//! Filesystem season store.
//!
//! Layout under the data directory:
//! - `seasons/<year>/results.jsonl`: drained results feed, one row per line
//! - `derived/<year>/progressive_<mode>.jsonl`: exported per-round standings
//! - `state/selected_season`: the saved season selection

mod jsonl;
mod state;

pub use jsonl::*;
pub use state::*;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::StandingMode;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed line {line} in {path:?}: {source}")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("Invalid state file {path:?}: {message}")]
    InvalidState { path: PathBuf, message: String },
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn seasons_dir(&self) -> PathBuf {
        self.data_dir.join("seasons")
    }

    pub fn season_dir(&self, season: i32) -> PathBuf {
        self.seasons_dir().join(season.to_string())
    }

    pub fn results_path(&self, season: i32) -> PathBuf {
        self.season_dir(season).join("results.jsonl")
    }

    pub fn derived_dir(&self) -> PathBuf {
        self.data_dir.join("derived")
    }

    pub fn progressive_report_path(&self, season: i32, mode: StandingMode) -> PathBuf {
        self.derived_dir()
            .join(season.to_string())
            .join(format!("progressive_{}.jsonl", mode))
    }

    pub fn state_dir(&self) -> PathBuf {
        self.data_dir.join("state")
    }

    pub fn selected_season_path(&self) -> PathBuf {
        self.state_dir().join("selected_season")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
