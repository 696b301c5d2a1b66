//! Routes, their paths and the stops they serve.

use serde::Serialize;

use crate::geo::Coordinate;

use super::{RouteId, StopId};

/// A stop a vehicle can call at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub id: StopId,
    pub location: Coordinate,
    pub name: String,
}

/// A route with its physical path and the stops it serves.
///
/// `path` is the ordered polyline from the route's origin to its end.
/// Segment logic needs at least two waypoints; shorter paths never
/// locate anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub id: RouteId,
    pub full_name: String,
    pub short_name: String,
    pub origin: String,
    pub path: Vec<Coordinate>,
    pub stops: Vec<Stop>,
}

impl Route {
    /// Whether any of this route's stops has the given id.
    pub fn serves(&self, stop_id: &StopId) -> bool {
        self.stops.iter().any(|s| &s.id == stop_id)
    }

    /// The route's descriptive fields, without path or stops.
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            id: self.id.clone(),
            full_name: self.full_name.clone(),
            short_name: self.short_name.clone(),
            origin: self.origin.clone(),
        }
    }
}

/// Descriptive fields of a route, as carried in arrival estimates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub id: RouteId,
    pub full_name: String,
    pub short_name: String,
    pub origin: String,
}
