//! Season selection.
//!
//! The working season is resolved once, from the most explicit source
//! available, and then passed to whatever needs it.

use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::fetch::ResultsProvider;
use crate::models::{SeasonSelection, SeasonSource};
use crate::storage::{read_selected_season, StorageConfig, StorageError};

/// Resolve the working season.
///
/// Precedence: `explicit`, then the persisted selection, then the
/// configured default, then the provider's active season. The provider is
/// only queried when nothing local names a season, and a provider failure
/// is logged and treated as "no season".
pub async fn resolve_season(
    explicit: Option<i32>,
    storage: &StorageConfig,
    config: &AppConfig,
    provider: Option<&ResultsProvider>,
) -> Result<Option<SeasonSelection>, StorageError> {
    let local = [
        (SeasonSource::Explicit, explicit),
        (SeasonSource::Persisted, read_selected_season(storage)?),
        (SeasonSource::Config, config.season.default),
    ];
    if let Some(selection) = SeasonSelection::resolve(local) {
        debug!("Using season {} ({:?})", selection.year, selection.source);
        return Ok(Some(selection));
    }

    let Some(provider) = provider else {
        return Ok(None);
    };

    match provider.active_season().await {
        Ok(active) => Ok(SeasonSelection::resolve([(SeasonSource::Provider, active)])),
        Err(e) => {
            warn!("Could not ask provider for the active season: {}", e);
            Ok(None)
        }
    }
}
