//! Conversion from feed DTOs to domain types.

use tracing::warn;

use crate::domain::{CrowdLevel, InvalidId, Route, RouteId, Stop, StopId, VehicleFix};
use crate::geo::Coordinate;

use super::types::{PositionsResponse, RoutePayload, RoutesResponse, StopPayload};

/// Error converting a feed payload into domain types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error(transparent)]
    InvalidId(#[from] InvalidId),

    /// A path entry was not a `[lat, lng]` pair.
    #[error("route {route}: path entry {index} has {len} values, expected 2")]
    MalformedWaypoint {
        route: String,
        index: usize,
        len: usize,
    },
}

/// Convert a `/busLines` response into routes, keeping feed order.
pub fn convert_routes(resp: &RoutesResponse) -> Result<Vec<Route>, ConversionError> {
    resp.payload
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(convert_route)
        .collect()
}

fn convert_route(payload: &RoutePayload) -> Result<Route, ConversionError> {
    let id = RouteId::parse(&payload.id)?;

    let path = payload
        .path
        .iter()
        .enumerate()
        .map(|(index, pair)| match pair.as_slice() {
            [lat, lng] => Ok(Coordinate::new(*lat, *lng)),
            other => Err(ConversionError::MalformedWaypoint {
                route: payload.id.clone(),
                index,
                len: other.len(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let stops = payload
        .bus_stops
        .iter()
        .map(convert_stop)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Route {
        id,
        full_name: payload.full_name.clone(),
        short_name: payload.short_name.clone(),
        origin: payload.origin.clone(),
        path,
        stops,
    })
}

fn convert_stop(payload: &StopPayload) -> Result<Stop, ConversionError> {
    Ok(Stop {
        id: StopId::parse(&payload.id)?,
        location: Coordinate::new(payload.lat, payload.lng),
        name: payload.name.clone(),
    })
}

/// Convert a `/busPositions` response into vehicle fixes.
///
/// Fixes with an unrecognised crowd level are dropped with a warning: one
/// bad report should not hide every other vehicle on the route.
pub fn convert_fixes(route_id: &RouteId, resp: &PositionsResponse) -> Vec<VehicleFix> {
    resp.payload
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|p| match p.crowd_level.parse::<CrowdLevel>() {
            Ok(crowd_level) => Some(VehicleFix {
                plate: p.vehicle_plate.clone(),
                bearing: p.bearing,
                location: Coordinate::new(p.lat, p.lng),
                crowd_level,
            }),
            Err(e) => {
                warn!(route = %route_id, vehicle = %p.vehicle_plate, error = %e, "Dropping fix");
                None
            }
        })
        .collect()
}
