//! Application state for the web layer.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::cache::CachedProvider;
use crate::estimator::EstimatorConfig;
use crate::provider::{DataSource, ProviderError};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Cached route and vehicle data
    pub provider: Arc<CachedProvider<DataSource>>,

    /// Arrival estimation configuration
    pub config: Arc<EstimatorConfig>,
}

impl AppState {
    pub fn new(provider: CachedProvider<DataSource>, config: EstimatorConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config: Arc::new(config),
        }
    }

    /// Re-read fixtures from `dir` and drop cached data so the next request
    /// sees them. Does nothing for the live feed.
    pub async fn reload_fixtures(&self, dir: &Path) -> Result<(), ProviderError> {
        let DataSource::Fixture(fixtures) = self.provider.inner() else {
            return Ok(());
        };
        fixtures.reload(dir).await?;
        self.provider.invalidate_all();
        info!(dir = %dir.display(), "Reloaded fixtures");
        Ok(())
    }
}
