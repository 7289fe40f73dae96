//! Season selection.
//!
//! The season being viewed is an explicit value resolved once and passed to
//! whatever needs it.

use serde::{Deserialize, Serialize};

/// First Formula 1 world championship season.
pub const FIRST_SEASON: i32 = 1950;

/// Where the selected season came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonSource {
    /// Passed on the command line or in a request
    Explicit,
    /// Previously saved with `season set`
    Persisted,
    /// `season.default` in the config file
    Config,
    /// Active season reported by the results provider
    Provider,
}

/// The season currently selected for viewing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonSelection {
    pub year: i32,
    pub source: SeasonSource,
}

impl SeasonSelection {
    pub fn new(year: i32, source: SeasonSource) -> Self {
        Self { year, source }
    }

    /// Pick the first valid candidate, in the order given.
    ///
    /// Candidates before the championship existed are skipped.
    pub fn resolve<I>(candidates: I) -> Option<Self>
    where
        I: IntoIterator<Item = (SeasonSource, Option<i32>)>,
    {
        candidates
            .into_iter()
            .filter_map(|(source, year)| year.map(|y| (source, y)))
            .find(|(_, year)| is_valid_season(*year))
            .map(|(source, year)| Self::new(year, source))
    }
}

/// Check that a year can be a championship season.
pub fn is_valid_season(year: i32) -> bool {
    year >= FIRST_SEASON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_first_candidate() {
        let selection = SeasonSelection::resolve([
            (SeasonSource::Explicit, Some(2023)),
            (SeasonSource::Persisted, Some(2022)),
            (SeasonSource::Config, Some(2024)),
        ])
        .unwrap();
        assert_eq!(selection, SeasonSelection::new(2023, SeasonSource::Explicit));
    }

    #[test]
    fn test_resolve_skips_missing() {
        let selection = SeasonSelection::resolve([
            (SeasonSource::Explicit, None),
            (SeasonSource::Persisted, None),
            (SeasonSource::Config, Some(2024)),
        ])
        .unwrap();
        assert_eq!(selection.year, 2024);
        assert_eq!(selection.source, SeasonSource::Config);
    }

    #[test]
    fn test_resolve_skips_invalid_years() {
        let selection = SeasonSelection::resolve([
            (SeasonSource::Persisted, Some(1900)),
            (SeasonSource::Provider, Some(2021)),
        ])
        .unwrap();
        assert_eq!(selection.year, 2021);
        assert_eq!(selection.source, SeasonSource::Provider);
    }

    #[test]
    fn test_resolve_none() {
        assert!(SeasonSelection::resolve([(SeasonSource::Explicit, None)]).is_none());
    }

    #[test]
    fn test_is_valid_season() {
        assert!(is_valid_season(1950));
        assert!(is_valid_season(2024));
        assert!(!is_valid_season(1949));
    }
}
