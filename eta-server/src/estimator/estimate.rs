//! Arrival estimation for a stop.
//!
//! For each route serving the stop, the estimator picks one vehicle that is
//! upstream of the stop, places both the vehicle and the stop on the route
//! path, and sums the path distance between them. Routes where any step
//! comes up empty simply contribute nothing; only provider failures and an
//! unknown stop fail the whole request.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, trace};

use crate::domain::{ArrivalEstimate, Route, RouteId, Stop, StopId, VehicleFix};
use crate::geo::{Coordinate, distance, is_between};
use crate::provider::ProviderError;

use super::config::{EstimatorConfig, VehicleSelection};
use super::locate::{Segment, locating_segment};
use super::resolver::{routes_serving_stop, stop_by_id};

/// Error from arrival estimation.
#[derive(Debug, thiserror::Error)]
pub enum EstimateError {
    /// The stop id does not match any stop on any route.
    #[error("cannot find stop with id {0}")]
    StopNotFound(StopId),

    /// Fetching routes or vehicle positions failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Source of route data and live vehicle positions.
///
/// This abstraction allows the estimator to run against the live feed, a
/// fixture directory or an in-memory mock.
pub trait TransitProvider: Send + Sync {
    /// All routes with their stops and paths, in feed order.
    fn fetch_routes(&self) -> impl Future<Output = Result<Arc<Vec<Route>>, ProviderError>> + Send;

    /// Current vehicle positions on a route. Empty means no vehicle is
    /// reporting, which is not an error.
    fn fetch_vehicle_fixes(
        &self,
        route_id: &RouteId,
    ) -> impl Future<Output = Result<Vec<VehicleFix>, ProviderError>> + Send;
}

/// Estimates arrivals at a stop from one provider snapshot.
pub struct ArrivalEstimator<'a, P: TransitProvider> {
    provider: &'a P,
    config: &'a EstimatorConfig,
}

impl<'a, P: TransitProvider> ArrivalEstimator<'a, P> {
    pub fn new(provider: &'a P, config: &'a EstimatorConfig) -> Self {
        Self { provider, config }
    }

    /// Estimate arrivals at `stop_id`, one per route that can produce one.
    ///
    /// Results follow route order; use [`crate::domain::sort_by_distance`]
    /// to rank them.
    pub async fn estimate(&self, stop_id: &StopId) -> Result<Vec<ArrivalEstimate>, EstimateError> {
        let routes = self.provider.fetch_routes().await?;

        let stop = stop_by_id(&routes, stop_id)
            .ok_or_else(|| EstimateError::StopNotFound(stop_id.clone()))?;

        let serving = routes_serving_stop(&routes, stop_id);
        debug!(stop = %stop_id, routes = serving.len(), "Resolved routes serving stop");

        let mut estimates = Vec::new();

        // Fetch fixes in bounded batches; join_all keeps route order.
        for batch in serving.chunks(self.config.effective_batch_size()) {
            let fetches = batch
                .iter()
                .map(|route| self.provider.fetch_vehicle_fixes(&route.id));
            let results = join_all(fetches).await;

            for (route, fixes) in batch.iter().zip(results) {
                let fixes = fixes?;
                if let Some(estimate) = estimate_route(route, stop, &fixes, self.config) {
                    estimates.push(estimate);
                }
            }
        }

        Ok(estimates)
    }
}

/// Estimate one route's arrival at `stop` from its vehicle fixes.
///
/// `None` when the route has no fixes, the stop or vehicle cannot be placed
/// on the path, no vehicle qualifies, or the chosen vehicle is already past
/// the stop.
pub fn estimate_route(
    route: &Route,
    stop: &Stop,
    fixes: &[VehicleFix],
    config: &EstimatorConfig,
) -> Option<ArrivalEstimate> {
    if fixes.is_empty() {
        debug!(route = %route.id, "No vehicles reporting");
        return None;
    }

    let Some(stop_segment) = locating_segment(&route.path, stop.location) else {
        debug!(route = %route.id, stop = %stop.id, "Stop not on any path segment");
        return None;
    };

    let first_waypoint = *route.path.first()?;
    let Some(vehicle) = select_vehicle(first_waypoint, fixes, stop.location, config.selection)
    else {
        debug!(route = %route.id, fixes = fixes.len(), "No vehicle upstream of stop");
        return None;
    };

    let Some(vehicle_segment) = locating_segment(&route.path, vehicle.location) else {
        debug!(route = %route.id, vehicle = %vehicle.plate, "Vehicle not on any path segment");
        return None;
    };

    if vehicle_segment.start > stop_segment.start {
        debug!(
            route = %route.id,
            vehicle = %vehicle.plate,
            vehicle_segment = vehicle_segment.start,
            stop_segment = stop_segment.start,
            "Vehicle already past stop"
        );
        return None;
    }

    let distance_m = travel_distance(
        &route.path,
        vehicle.location,
        vehicle_segment,
        stop.location,
        stop_segment,
    );
    let estimated_minutes = config.speeds.minutes_for(distance_m, vehicle.crowd_level);

    trace!(
        route = %route.id,
        vehicle = %vehicle.plate,
        distance_m,
        estimated_minutes,
        "Estimated arrival"
    );

    Some(ArrivalEstimate {
        route: route.summary(),
        vehicle: vehicle.clone(),
        distance_m,
        estimated_minutes,
    })
}

/// Choose the fix closest to the route's first waypoint among those lying
/// between the first waypoint and the stop.
///
/// Ties go to the earlier fix. Under [`VehicleSelection::FallbackToFirst`]
/// the first fix starts as the candidate whether or not it qualifies, so it
/// is returned when no qualifying fix is strictly closer.
pub fn select_vehicle<'f>(
    first_waypoint: Coordinate,
    fixes: &'f [VehicleFix],
    stop: Coordinate,
    selection: VehicleSelection,
) -> Option<&'f VehicleFix> {
    let mut best: Option<(&VehicleFix, f64)> = match selection {
        VehicleSelection::AdmissibleOnly => None,
        VehicleSelection::FallbackToFirst => fixes
            .first()
            .map(|f| (f, distance(first_waypoint, f.location))),
    };

    for fix in fixes {
        if !is_between(first_waypoint, stop, fix.location) {
            continue;
        }
        let d = distance(first_waypoint, fix.location);
        match best {
            Some((_, min)) if d >= min => {}
            _ => best = Some((fix, d)),
        }
    }

    best.map(|(fix, _)| fix)
}

/// Path distance from a vehicle to a stop, in metres.
///
/// Vehicle to the end of its segment, then every whole segment up to the
/// start of the stop's segment, then from there to the stop. Expects
/// `vehicle_segment.start <= stop_segment.start`; when both share a segment
/// the whole-segment sum is empty.
///
/// # Panics
///
/// If either segment indexes past the end of `path`. Segments returned by
/// [`locating_segment`] on the same path are always in range.
pub(crate) fn travel_distance(
    path: &[Coordinate],
    vehicle: Coordinate,
    vehicle_segment: Segment,
    stop: Coordinate,
    stop_segment: Segment,
) -> f64 {
    let to_next_waypoint = distance(vehicle, path[vehicle_segment.end]);
    let into_stop_segment = distance(path[stop_segment.start], stop);

    let between: f64 = (vehicle_segment.end..stop_segment.start)
        .map(|i| distance(path[i], path[i + 1]))
        .sum();

    to_next_waypoint + between + into_stop_segment
}
