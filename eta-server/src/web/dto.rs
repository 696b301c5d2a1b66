//! Data transfer objects for web requests and responses.
//!
//! Field names are camelCase, as in the bus feed. Route and position results
//! reuse the feed's field names; arrival results have their own shape.

use serde::{Deserialize, Serialize};

use crate::domain::{ArrivalEstimate, Route, Stop, VehicleFix};

/// Status code carried in every successful envelope.
pub const STATUS_SUCCESS: i64 = 100000;

/// Successful response wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub payload: T,
    pub status: i64,
}

impl<T> Envelope<T> {
    pub fn success(payload: T) -> Self {
        Self {
            payload,
            status: STATUS_SUCCESS,
        }
    }
}

/// Query string for arrival requests.
#[derive(Debug, Default, Deserialize)]
pub struct ArrivalQuery {
    /// `distance` to rank by travel distance; anything else keeps route order.
    pub sort: Option<String>,
}

impl ArrivalQuery {
    pub fn sort_by_distance(&self) -> bool {
        self.sort.as_deref() == Some("distance")
    }
}

/// A route with its stops and path.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub id: String,
    pub full_name: String,
    pub short_name: String,
    pub origin: String,

    /// `[lat, lng]` pairs
    pub path: Vec<[f64; 2]>,

    pub bus_stops: Vec<StopResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StopResult {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub name: String,
}

/// A vehicle's current position.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionResult {
    pub vehicle_plate: String,
    pub bearing: f64,
    pub lat: f64,
    pub lng: f64,
    pub crowd_level: String,
}

/// One route's next vehicle towards the requested stop.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalResult {
    pub route_id: String,
    pub full_name: String,
    pub short_name: String,
    pub origin: String,
    pub vehicle: ArrivalVehicle,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalVehicle {
    pub vehicle_plate: String,
    pub bearing: f64,
    pub lat: f64,
    pub lng: f64,
    pub crowd_level: String,

    /// Metres along the route path
    pub distance: f64,

    pub estimated_minutes: f64,

    /// Estimated minutes as whole seconds, rounded
    pub estimated_seconds: u64,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// RFC 3339 server time
    pub timestamp: String,
    pub version: String,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl From<&Stop> for StopResult {
    fn from(stop: &Stop) -> Self {
        Self {
            id: stop.id.to_string(),
            lat: stop.location.lat,
            lng: stop.location.lng,
            name: stop.name.clone(),
        }
    }
}

impl From<&Route> for RouteResult {
    fn from(route: &Route) -> Self {
        Self {
            id: route.id.to_string(),
            full_name: route.full_name.clone(),
            short_name: route.short_name.clone(),
            origin: route.origin.clone(),
            path: route.path.iter().map(|c| [c.lat, c.lng]).collect(),
            bus_stops: route.stops.iter().map(StopResult::from).collect(),
        }
    }
}

impl From<&VehicleFix> for PositionResult {
    fn from(fix: &VehicleFix) -> Self {
        Self {
            vehicle_plate: fix.plate.clone(),
            bearing: fix.bearing,
            lat: fix.location.lat,
            lng: fix.location.lng,
            crowd_level: fix.crowd_level.to_string(),
        }
    }
}

impl From<&ArrivalEstimate> for ArrivalResult {
    fn from(e: &ArrivalEstimate) -> Self {
        Self {
            route_id: e.route.id.to_string(),
            full_name: e.route.full_name.clone(),
            short_name: e.route.short_name.clone(),
            origin: e.route.origin.clone(),
            vehicle: ArrivalVehicle {
                vehicle_plate: e.vehicle.plate.clone(),
                bearing: e.vehicle.bearing,
                lat: e.vehicle.location.lat,
                lng: e.vehicle.location.lng,
                crowd_level: e.vehicle.crowd_level.to_string(),
                distance: e.distance_m,
                estimated_minutes: e.estimated_minutes,
                estimated_seconds: e.eta().as_secs_f64().round() as u64,
            },
        }
    }
}
