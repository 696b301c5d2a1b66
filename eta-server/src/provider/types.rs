//! Transit feed response DTOs.
//!
//! These types map directly to the feed's JSON. The feed wraps every list in
//! a `{"payload": [...], "status": n}` envelope and omits `payload` when
//! there is nothing to report, so the payload is optional.

use serde::Deserialize;

/// Response from `GET /busLines`.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutesResponse {
    pub payload: Option<Vec<RoutePayload>>,
    pub status: Option<i64>,
}

/// One route (bus line) with its stops and path.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePayload {
    pub id: String,

    #[serde(default)]
    pub full_name: String,

    #[serde(default)]
    pub short_name: String,

    #[serde(default)]
    pub origin: String,

    /// Waypoints as `[lat, lng]` pairs, origin first.
    #[serde(default)]
    pub path: Vec<Vec<f64>>,

    #[serde(default)]
    pub bus_stops: Vec<StopPayload>,
}

/// A stop on a route.
#[derive(Debug, Clone, Deserialize)]
pub struct StopPayload {
    pub id: String,
    pub lat: f64,
    pub lng: f64,

    #[serde(default)]
    pub name: String,
}

/// Response from `GET /busPositions/{routeId}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionsResponse {
    pub payload: Option<Vec<PositionPayload>>,
    pub status: Option<i64>,
}

/// One vehicle's reported position.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionPayload {
    pub vehicle_plate: String,

    #[serde(default)]
    pub bearing: f64,

    pub lat: f64,
    pub lng: f64,

    /// `low`, `medium` or `high`.
    pub crowd_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_routes_response() {
        let json = r#"{
            "payload": [{
                "id": "44480",
                "fullName": "Boon Lay Int - Jurong West",
                "shortName": "179",
                "origin": "Boon Lay Int",
                "path": [[1.33, 103.69], [1.33, 103.692]],
                "busStops": [{"id": "377906", "lat": 1.33, "lng": 103.691, "name": "Opp Blk 1"}]
            }],
            "status": 100000
        }"#;
        let resp: RoutesResponse = serde_json::from_str(json).unwrap();
        let routes = resp.payload.unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].short_name, "179");
        assert_eq!(routes[0].path[1], vec![1.33, 103.692]);
        assert_eq!(routes[0].bus_stops[0].name, "Opp Blk 1");
    }

    #[test]
    fn parse_positions_response() {
        let json = r#"{
            "payload": [{"bearing": 159.4, "crowdLevel": "low", "lat": 1.338066, "lng": 103.695944, "vehiclePlate": "PD1064Z"}],
            "status": 100000
        }"#;
        let resp: PositionsResponse = serde_json::from_str(json).unwrap();
        let fixes = resp.payload.unwrap();
        assert_eq!(fixes[0].vehicle_plate, "PD1064Z");
        assert_eq!(fixes[0].crowd_level, "low");
    }

    #[test]
    fn missing_payload_is_none() {
        let resp: PositionsResponse = serde_json::from_str(r#"{"status": 100000}"#).unwrap();
        assert!(resp.payload.is_none());

        let resp: PositionsResponse =
            serde_json::from_str(r#"{"payload": null, "status": 100000}"#).unwrap();
        assert!(resp.payload.is_none());
    }
}
