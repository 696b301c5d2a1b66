//! Fixture-backed provider for development and testing without the live feed.
//!
//! Reads the same JSON the feed serves: `routes.json` for the route list and
//! `positions/{routeId}.json` for each route's vehicles.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::{Route, RouteId, VehicleFix};
use crate::estimator::TransitProvider;

use super::convert::{convert_fixes, convert_routes};
use super::error::ProviderError;
use super::types::{PositionsResponse, RoutesResponse};

#[derive(Debug, Clone, Default)]
struct Snapshot {
    routes: Arc<Vec<Route>>,
    fixes: HashMap<RouteId, Vec<VehicleFix>>,
}

/// Provider serving a static snapshot of routes and vehicle positions.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    snapshot: Arc<RwLock<Snapshot>>,
}

impl FixtureProvider {
    /// Build a provider from in-memory data. Routes without an entry in
    /// `fixes` have no vehicles.
    pub fn new(routes: Vec<Route>, fixes: HashMap<RouteId, Vec<VehicleFix>>) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Snapshot {
                routes: Arc::new(routes),
                fixes,
            })),
        }
    }

    /// Load fixtures from a directory.
    ///
    /// `routes.json` is required. A route with no `positions/{id}.json` has
    /// no vehicles.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let snapshot = read_snapshot(dir.as_ref())?;
        Ok(Self {
            snapshot: Arc::new(RwLock::new(snapshot)),
        })
    }

    /// Replace the snapshot with a fresh read of `dir`. On error the current
    /// snapshot is kept.
    ///
    /// Files are read on the blocking pool.
    pub async fn reload(&self, dir: impl AsRef<Path>) -> Result<(), ProviderError> {
        let dir = dir.as_ref().to_path_buf();
        let fresh = tokio::task::spawn_blocking(move || read_snapshot(&dir))
            .await
            .map_err(|e| ProviderError::unavailable(format!("fixture reload failed: {e}")))??;
        *self.snapshot.write().await = fresh;
        Ok(())
    }
}

fn read_snapshot(dir: &Path) -> Result<Snapshot, ProviderError> {
    let resp: RoutesResponse = read_json(&dir.join("routes.json"))?;
    let routes = convert_routes(&resp).map_err(|e| ProviderError::bad_response(e.to_string()))?;

    let mut fixes = HashMap::new();
    for route in &routes {
        let path = dir
            .join("positions")
            .join(format!("{}.json", route.id.as_str()));
        if !path.is_file() {
            continue;
        }
        let resp: PositionsResponse = read_json(&path)?;
        fixes.insert(route.id.clone(), convert_fixes(&route.id, &resp));
    }

    info!(
        dir = %dir.display(),
        routes = routes.len(),
        routes_with_positions = fixes.len(),
        "Loaded transit fixtures"
    );

    Ok(Snapshot {
        routes: Arc::new(routes),
        fixes,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ProviderError> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        ProviderError::unavailable(format!("failed to read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&json).map_err(|e| {
        ProviderError::bad_response(format!("failed to parse {}: {e}", path.display()))
    })
}

impl TransitProvider for FixtureProvider {
    async fn fetch_routes(&self) -> Result<Arc<Vec<Route>>, ProviderError> {
        Ok(Arc::clone(&self.snapshot.read().await.routes))
    }

    async fn fetch_vehicle_fixes(&self, route_id: &RouteId) -> Result<Vec<VehicleFix>, ProviderError> {
        let snapshot = self.snapshot.read().await;
        Ok(snapshot.fixes.get(route_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/fixtures");

    fn rid(s: &str) -> RouteId {
        RouteId::parse(s).unwrap()
    }

    #[tokio::test]
    async fn load_fixture_data() {
        let provider = FixtureProvider::load(FIXTURES).unwrap();
        let routes = provider.fetch_routes().await.unwrap();

        let ids: Vec<_> = routes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["R2", "R1", "R3", "R4"]);

        let fixes = provider.fetch_vehicle_fixes(&rid("R1")).await.unwrap();
        let plates: Vec<_> = fixes.iter().map(|f| f.plate.as_str()).collect();
        assert_eq!(plates, ["SBS1001A", "SBS1002B"]);

        // The second R2 vehicle reports an unknown crowd level.
        let fixes = provider.fetch_vehicle_fixes(&rid("R2")).await.unwrap();
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].plate, "SBS2001C");
    }

    #[tokio::test]
    async fn route_without_positions_file_has_no_fixes() {
        let provider = FixtureProvider::load(FIXTURES).unwrap();
        assert!(provider.fetch_vehicle_fixes(&rid("R4")).await.unwrap().is_empty());
        assert!(provider.fetch_vehicle_fixes(&rid("NOPE")).await.unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FixtureProvider::load(dir.path().join("absent")).unwrap_err();
        assert!(err.to_string().contains("routes.json"));
    }

    #[test]
    fn malformed_routes_file_is_bad_response() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("routes.json"), "not json").unwrap();

        let err = FixtureProvider::load(dir.path()).unwrap_err();
        assert!(err.is_bad_response(), "{err}");
    }

    #[tokio::test]
    async fn reload_picks_up_changes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("positions")).unwrap();
        std::fs::write(
            dir.path().join("routes.json"),
            r#"{"payload":[{"id":"A","path":[[1.33,103.69],[1.33,103.692]]}],"status":100000}"#,
        )
        .unwrap();

        let provider = FixtureProvider::load(dir.path()).unwrap();
        assert!(provider.fetch_vehicle_fixes(&rid("A")).await.unwrap().is_empty());

        std::fs::write(
            dir.path().join("positions").join("A.json"),
            r#"{"payload":[{"vehiclePlate":"X1","bearing":0,"lat":1.33,"lng":103.691,"crowdLevel":"high"}]}"#,
        )
        .unwrap();
        provider.reload(dir.path()).await.unwrap();

        let fixes = provider.fetch_vehicle_fixes(&rid("A")).await.unwrap();
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].plate, "X1");
    }

    #[tokio::test]
    async fn failed_reload_keeps_snapshot() {
        let provider = FixtureProvider::load(FIXTURES).unwrap();
        let dir = tempfile::tempdir().unwrap();

        assert!(provider.reload(dir.path()).await.is_err());
        assert_eq!(provider.fetch_routes().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn in_memory_provider() {
        let provider = FixtureProvider::new(Vec::new(), HashMap::new());
        assert!(provider.fetch_routes().await.unwrap().is_empty());
    }
}
