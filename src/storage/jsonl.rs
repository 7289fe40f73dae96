//! JSONL (JSON Lines) storage.
//!
//! Each line is a valid JSON object representing one row.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use super::{StorageConfig, StorageError};
use crate::models::{RaceResult, RoundStandings, StandingMode};

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Sibling file the rows are staged in before replacing `path`.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write rows, replacing the entire file.
    ///
    /// Rows go to a staging file that is renamed over the target once
    /// complete, so readers see either the old file or the new one.
    pub fn write_all(&self, rows: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let staging = self.staging_path();
        let count = match write_file(&staging, rows) {
            Ok(count) => count,
            Err(e) => {
                let _ = fs::remove_file(&staging);
                return Err(e);
            }
        };
        fs::rename(&staging, &self.path)?;
        info!("Wrote {} rows to {:?}", count, self.path);

        Ok(count)
    }
}

fn write_file<T: Serialize>(path: &Path, rows: &[T]) -> Result<usize, StorageError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut count = 0;
    for row in rows {
        let json = serde_json::to_string(row)?;
        writeln!(writer, "{}", json)?;
        count += 1;
    }
    writer
        .into_inner()
        .map_err(|e| e.into_error())?
        .sync_all()?;
    Ok(count)
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Read all rows. A missing file reads as empty; a line that does not
    /// parse is an error carrying its 1-based line number.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut rows = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let row = serde_json::from_str(&line).map_err(|source| StorageError::MalformedLine {
                path: self.path.clone(),
                line: i + 1,
                source,
            })?;
            rows.push(row);
        }

        debug!("Read {} rows from {:?}", rows.len(), self.path);
        Ok(rows)
    }
}

/// Find all seasons present in the store, oldest first.
pub fn list_seasons(config: &StorageConfig) -> Result<Vec<i32>, StorageError> {
    let dir = config.seasons_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut seasons = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        match entry.file_name().to_str().map(str::parse::<i32>) {
            Some(Ok(year)) => seasons.push(year),
            _ => debug!("Ignoring non-season directory {:?}", entry.path()),
        }
    }

    seasons.sort_unstable();
    Ok(seasons)
}

/// Read a season's results.
///
/// A season with no stored file reads as empty. Any malformed line is an
/// error so a corrupt store is never ranked from a partial set.
pub fn read_season_results(
    config: &StorageConfig,
    season: i32,
) -> Result<Vec<RaceResult>, StorageError> {
    JsonlReader::new(config.results_path(season)).read_all()
}

/// Replace a season's results.
pub fn write_season_results(
    config: &StorageConfig,
    season: i32,
    results: &[RaceResult],
) -> Result<usize, StorageError> {
    JsonlWriter::new(config.results_path(season)).write_all(results)
}

/// Write a progressive standings report (one round per line).
pub fn write_progressive_report(
    config: &StorageConfig,
    season: i32,
    mode: StandingMode,
    tables: &[RoundStandings],
) -> Result<PathBuf, StorageError> {
    let writer = JsonlWriter::new(config.progressive_report_path(season, mode));
    writer.write_all(tables)?;
    Ok(writer.path().to_path_buf())
}
