//! Race result model: one driver's outcome in one race.

use serde::{Deserialize, Serialize};

use super::{ConstructorId, DriverId, RaceId};

/// How a driver's race ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ResultStatus {
    #[default]
    Finished,
    #[serde(alias = "dnf")]
    Retired,
    #[serde(alias = "dsq")]
    Disqualified,
    #[serde(alias = "dns")]
    DidNotStart,
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultStatus::Finished => write!(f, "finished"),
            ResultStatus::Retired => write!(f, "retired"),
            ResultStatus::Disqualified => write!(f, "disqualified"),
            ResultStatus::DidNotStart => write!(f, "did-not-start"),
        }
    }
}

/// A driver's classified outcome in one race, as delivered by the results feed.
///
/// `race_date` and `round` are kept in their raw feed form; they are only
/// trusted after [`crate::calculate::validate_results`] has accepted the
/// whole set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    /// Race this result belongs to
    pub race_id: RaceId,

    /// Race date (`YYYY-MM-DD`), used for chronological ordering
    pub race_date: String,

    /// 1-based sequence number of the race within its season
    pub round: i64,

    pub driver_id: DriverId,

    /// Constructor the driver raced for in this race
    pub constructor_id: ConstructorId,

    /// Championship points scored (0 if none)
    #[serde(default)]
    pub points: f64,

    /// Final classified position (None if not classified)
    #[serde(default)]
    pub position: Option<u32>,

    #[serde(default)]
    pub status: ResultStatus,
}

impl RaceResult {
    /// Create a finished, pointless, unclassified result.
    pub fn new(
        race_id: RaceId,
        race_date: impl Into<String>,
        round: i64,
        driver_id: DriverId,
        constructor_id: ConstructorId,
    ) -> Self {
        Self {
            race_id,
            race_date: race_date.into(),
            round,
            driver_id,
            constructor_id,
            points: 0.0,
            position: None,
            status: ResultStatus::Finished,
        }
    }

    /// Builder method to set points.
    pub fn with_points(mut self, points: f64) -> Self {
        self.points = points;
        self
    }

    /// Builder method to set the classified position.
    pub fn with_position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }

    /// Builder method to set status.
    pub fn with_status(mut self, status: ResultStatus) -> Self {
        self.status = status;
        self
    }

    /// Check if this result is a race win.
    pub fn is_win(&self) -> bool {
        self.position == Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RaceResult {
        RaceResult::new(
            "2024_1".into(),
            "2024-03-02",
            1,
            "max_verstappen".into(),
            "red_bull".into(),
        )
    }

    #[test]
    fn test_race_result_defaults() {
        let result = sample();
        assert_eq!(result.points, 0.0);
        assert_eq!(result.position, None);
        assert_eq!(result.status, ResultStatus::Finished);
        assert!(!result.is_win());
    }

    #[test]
    fn test_race_result_builder() {
        let result = sample().with_points(26.0).with_position(1);
        assert_eq!(result.points, 26.0);
        assert!(result.is_win());

        let dnf = sample().with_status(ResultStatus::Retired);
        assert_eq!(dnf.status, ResultStatus::Retired);
        assert!(!dnf.is_win());
    }

    #[test]
    fn test_status_accepts_feed_aliases() {
        let status: ResultStatus = serde_json::from_str("\"dnf\"").unwrap();
        assert_eq!(status, ResultStatus::Retired);
        let status: ResultStatus = serde_json::from_str("\"dsq\"").unwrap();
        assert_eq!(status, ResultStatus::Disqualified);
        let status: ResultStatus = serde_json::from_str("\"dns\"").unwrap();
        assert_eq!(status, ResultStatus::DidNotStart);
        let status: ResultStatus = serde_json::from_str("\"did-not-start\"").unwrap();
        assert_eq!(status, ResultStatus::DidNotStart);
    }

    #[test]
    fn test_race_result_deserialize_minimal_row() {
        let json = r#"{
            "race_id": "2024_5",
            "race_date": "2024-04-21",
            "round": 5,
            "driver_id": "norris",
            "constructor_id": "mclaren"
        }"#;
        let result: RaceResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.round, 5);
        assert_eq!(result.points, 0.0);
        assert_eq!(result.position, None);
        assert_eq!(result.status, ResultStatus::Finished);
    }

    #[test]
    fn test_race_result_serialization() {
        let result = sample().with_points(25.0).with_position(1);
        let json = serde_json::to_string(&result).unwrap();
        let back: RaceResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
        assert!(json.contains("\"status\":\"finished\""));
    }
}
