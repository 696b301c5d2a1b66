//! Caching layer for transit provider responses.
//!
//! The route list changes rarely and is cached for minutes. Vehicle
//! positions go stale quickly, so each route's fixes are cached for seconds;
//! this still collapses bursts of arrival queries for stops on the same
//! routes into one upstream call per route. Failures are never cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::{Route, RouteId, VehicleFix};
use crate::estimator::TransitProvider;
use crate::provider::ProviderError;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for the route list.
    pub routes_ttl: Duration,

    /// TTL for each route's vehicle fixes.
    pub fixes_ttl: Duration,

    /// Maximum number of routes whose fixes are cached.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            routes_ttl: Duration::from_secs(300),
            fixes_ttl: Duration::from_secs(10),
            max_capacity: 1000,
        }
    }
}

/// Provider wrapper that caches routes and vehicle fixes.
pub struct CachedProvider<P> {
    inner: P,

    /// Single-entry cache for the route list.
    routes: MokaCache<(), Arc<Vec<Route>>>,

    fixes: MokaCache<RouteId, Arc<Vec<VehicleFix>>>,
}

impl<P: TransitProvider> CachedProvider<P> {
    pub fn new(inner: P, config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.routes_ttl)
            .max_capacity(1)
            .build();

        let fixes = MokaCache::builder()
            .time_to_live(config.fixes_ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            routes,
            fixes,
        }
    }

    /// Access the underlying provider for operations that bypass the cache.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Drop every cached entry, e.g. after the underlying data is reloaded.
    pub fn invalidate_all(&self) {
        self.routes.invalidate_all();
        self.fixes.invalidate_all();
    }
}

impl<P: TransitProvider> TransitProvider for CachedProvider<P> {
    async fn fetch_routes(&self) -> Result<Arc<Vec<Route>>, ProviderError> {
        if let Some(cached) = self.routes.get(&()).await {
            trace!("Route list cache hit");
            return Ok(cached);
        }

        let routes = self.inner.fetch_routes().await?;
        self.routes.insert((), Arc::clone(&routes)).await;
        Ok(routes)
    }

    async fn fetch_vehicle_fixes(&self, route_id: &RouteId) -> Result<Vec<VehicleFix>, ProviderError> {
        if let Some(cached) = self.fixes.get(route_id).await {
            trace!(route = %route_id, "Vehicle fixes cache hit");
            return Ok(cached.as_ref().clone());
        }

        let fixes = self.inner.fetch_vehicle_fixes(route_id).await?;
        self.fixes
            .insert(route_id.clone(), Arc::new(fixes.clone()))
            .await;
        Ok(fixes)
    }
}
