//! Live transit feed HTTP client.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::{Route, RouteId, VehicleFix};
use crate::estimator::TransitProvider;

use super::convert::{convert_fixes, convert_routes};
use super::error::ProviderError;
use super::types::{PositionsResponse, RoutesResponse};

const DEFAULT_MAX_CONCURRENT: usize = 5;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How much of an undecodable body to keep for diagnostics.
const BODY_SNIPPET_CHARS: usize = 500;

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Base URL of the feed, without a trailing slash.
    pub endpoint: String,
    /// Maximum concurrent upstream requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FeedConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the live bus feed.
///
/// A semaphore caps in-flight requests so a burst of arrival queries cannot
/// flood the upstream service.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    endpoint: String,
    semaphore: Arc<Semaphore>,
}

impl FeedClient {
    pub fn new(config: FeedConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// GET `{endpoint}{path}` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ProviderError::unavailable("request limiter closed"))?;

        let url = format!("{}{}", self.endpoint, path);
        debug!(%url, "Fetching from transit feed");

        let response = self.http.get(&url).send().await.map_err(|e| {
            warn!(%url, error = %e, "Transit feed request failed");
            ProviderError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Transit feed returned error status");
            return Err(ProviderError::unavailable(format!(
                "{url} returned status {}",
                status.as_u16()
            )));
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| ProviderError::BadResponse {
            message: e.to_string(),
            body: Some(body.chars().take(BODY_SNIPPET_CHARS).collect()),
        })
    }
}

impl TransitProvider for FeedClient {
    async fn fetch_routes(&self) -> Result<Arc<Vec<Route>>, ProviderError> {
        let resp: RoutesResponse = self.get_json("/busLines").await?;
        let routes =
            convert_routes(&resp).map_err(|e| ProviderError::bad_response(e.to_string()))?;
        debug!(routes = routes.len(), "Fetched routes");
        Ok(Arc::new(routes))
    }

    async fn fetch_vehicle_fixes(&self, route_id: &RouteId) -> Result<Vec<VehicleFix>, ProviderError> {
        let resp: PositionsResponse = self
            .get_json(&format!("/busPositions/{}", route_id.as_str()))
            .await?;
        Ok(convert_fixes(route_id, &resp))
    }
}
