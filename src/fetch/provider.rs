//! Season-level access to the results provider.

use tracing::info;
use url::Url;

use super::{
    convert_results, drain_pages, pick_active_season, ApiResult, ApiSeason, DrainOptions,
    FetchError, HttpFetcher, HttpFetcherConfig, PageFetcher, RetryConfig,
};
use crate::config::ProviderConfig;
use crate::models::RaceResult;

/// Client for the provider's `/results/` and `/seasons/` endpoints.
pub struct ResultsProvider {
    fetcher: Box<dyn PageFetcher>,
    base_url: Url,
    page_size: u32,
    drain: DrainOptions,
}

impl ResultsProvider {
    /// Build a provider over an arbitrary page fetcher.
    pub fn new(
        fetcher: Box<dyn PageFetcher>,
        base_url: &str,
        page_size: u32,
        drain: DrainOptions,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            fetcher,
            base_url: normalize_base_url(base_url)?,
            page_size,
            drain,
        })
    }

    /// Build an HTTP-backed provider from configuration.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(HttpFetcherConfig {
            timeout: config.timeout(),
            retry: RetryConfig {
                max_retries: config.max_retries,
                ..RetryConfig::default()
            },
            ..HttpFetcherConfig::default()
        })?;

        Self::new(
            Box::new(fetcher),
            &config.base_url,
            config.page_size,
            DrainOptions {
                request_delay: config.request_delay(),
                max_pages: config.max_pages,
            },
        )
    }

    /// URL of the first results page for a season.
    pub fn season_results_url(&self, season: i32) -> Result<Url, FetchError> {
        let mut url = self.endpoint("results/")?;
        url.query_pairs_mut()
            .append_pair("race__season", &season.to_string())
            .append_pair("page_size", &self.page_size.to_string());
        Ok(url)
    }

    /// Every result of a season, with all pages drained.
    pub async fn fetch_season_results(&self, season: i32) -> Result<Vec<RaceResult>, FetchError> {
        let url = self.season_results_url(season)?;
        info!("Fetching results for season {} from {}", season, url);

        let rows: Vec<ApiResult> = drain_pages(self.fetcher.as_ref(), url, &self.drain).await?;
        convert_results(season, rows)
    }

    /// The season the provider marks active, if any.
    pub async fn active_season(&self) -> Result<Option<i32>, FetchError> {
        let url = self.endpoint("seasons/")?;
        let seasons: Vec<ApiSeason> = drain_pages(self.fetcher.as_ref(), url, &self.drain).await?;
        Ok(pick_active_season(&seasons))
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path)
            .map_err(|e| FetchError::InvalidUrl(format!("{}{}: {}", self.base_url, path, e)))
    }
}

/// Parse the base URL, making sure relative joins append to its path.
fn normalize_base_url(base_url: &str) -> Result<Url, FetchError> {
    let mut raw = base_url.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base_url, e)))
}

impl std::fmt::Debug for ResultsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultsProvider")
            .field("base_url", &self.base_url.as_str())
            .field("page_size", &self.page_size)
            .field("drain", &self.drain)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::super::mock::{mock_provider, MockFetcher};
    use super::*;
    use serde_json::json;

    fn result_row(round: i64, driver: &str, points: f64) -> serde_json::Value {
        json!({
            "race": {"race_id": format!("2024_{}", round), "season": 2024, "round": round, "date": format!("2024-03-0{}", round)},
            "driver": {"driver_id": driver},
            "constructor": {"constructor_id": "ferrari"},
            "final_position": 1,
            "points": points,
            "status": "finished"
        })
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://host/api/v1").unwrap().as_str(),
            "http://host/api/v1/"
        );
        assert_eq!(
            normalize_base_url("http://host/api/v1/").unwrap().as_str(),
            "http://host/api/v1/"
        );
        assert!(normalize_base_url("not a url").is_err());
    }

    #[test]
    fn test_season_results_url() {
        let provider = mock_provider(MockFetcher::new());
        assert_eq!(
            provider.season_results_url(2024).unwrap().as_str(),
            "http://api.test/api/v1/results/?race__season=2024&page_size=2"
        );
    }

    #[tokio::test]
    async fn test_fetch_season_results_drains_all_pages() {
        let fetcher = MockFetcher::new()
            .with_response(
                "http://api.test/api/v1/results/?race__season=2024&page_size=2",
                json!({
                    "count": 3,
                    "next": "http://api.test/api/v1/results/?page=2&race__season=2024&page_size=2",
                    "previous": null,
                    "results": [result_row(1, "leclerc", 25.0), result_row(1, "sainz", 18.0)]
                }),
            )
            .with_response(
                "http://api.test/api/v1/results/?page=2&race__season=2024&page_size=2",
                json!({"count": 3, "next": null, "results": [result_row(2, "leclerc", 25.0)]}),
            );

        let provider = mock_provider(fetcher);
        let results = provider.fetch_season_results(2024).await.unwrap();

        let drivers: Vec<&str> = results.iter().map(|r| r.driver_id.as_str()).collect();
        assert_eq!(drivers, vec!["leclerc", "sainz", "leclerc"]);
        assert_eq!(results[2].round, 2);
    }

    #[tokio::test]
    async fn test_active_season() {
        let fetcher = MockFetcher::new().with_response(
            "http://api.test/api/v1/seasons/",
            json!({"count": 2, "next": null, "results": [
                {"id": 1, "year": 2025, "is_active": false},
                {"id": 2, "year": 2024, "is_active": true}
            ]}),
        );

        let provider = mock_provider(fetcher);
        assert_eq!(provider.active_season().await.unwrap(), Some(2024));
    }

    #[test]
    fn test_from_config() {
        let provider = ResultsProvider::from_config(&ProviderConfig::default()).unwrap();
        assert_eq!(
            provider.season_results_url(2023).unwrap().as_str(),
            "http://localhost:8000/api/v1/results/?race__season=2023&page_size=100"
        );
    }
}
