//! Stop and route lookup over a route snapshot.

use crate::domain::{Route, Stop, StopId};

/// Routes with at least one stop matching `stop_id`, in snapshot order.
///
/// Empty when nothing serves the stop; that is not an error.
pub fn routes_serving_stop<'a>(routes: &'a [Route], stop_id: &StopId) -> Vec<&'a Route> {
    routes.iter().filter(|r| r.serves(stop_id)).collect()
}

/// The first stop across all routes with the given id.
pub fn stop_by_id<'a>(routes: &'a [Route], stop_id: &StopId) -> Option<&'a Stop> {
    routes
        .iter()
        .flat_map(|r| r.stops.iter())
        .find(|s| &s.id == stop_id)
}
