//! Transit data providers.
//!
//! The live feed serves a route list (`/busLines`) with each route's stops and
//! path, and current vehicle positions per route (`/busPositions/{id}`).
//! Fixture directories hold the same JSON so the service can run offline.

mod client;
mod convert;
mod error;
mod fixture;
mod types;

use std::sync::Arc;

pub use client::{FeedClient, FeedConfig};
pub use convert::{ConversionError, convert_fixes, convert_routes};
pub use error::ProviderError;
pub use fixture::FixtureProvider;
pub use types::{PositionPayload, PositionsResponse, RoutePayload, RoutesResponse, StopPayload};

use crate::domain::{Route, RouteId, VehicleFix};
use crate::estimator::TransitProvider;

/// Where route and vehicle data comes from, chosen at startup.
#[derive(Debug, Clone)]
pub enum DataSource {
    Live(FeedClient),
    Fixture(FixtureProvider),
}

impl TransitProvider for DataSource {
    async fn fetch_routes(&self) -> Result<Arc<Vec<Route>>, ProviderError> {
        match self {
            DataSource::Live(client) => client.fetch_routes().await,
            DataSource::Fixture(fixture) => fixture.fetch_routes().await,
        }
    }

    async fn fetch_vehicle_fixes(&self, route_id: &RouteId) -> Result<Vec<VehicleFix>, ProviderError> {
        match self {
            DataSource::Live(client) => client.fetch_vehicle_fixes(route_id).await,
            DataSource::Fixture(fixture) => fixture.fetch_vehicle_fixes(route_id).await,
        }
    }
}
