//! Arrival estimates.

use std::time::Duration;

use serde::Serialize;

use super::{RouteSummary, VehicleFix};

/// Estimated approach of one vehicle on one route towards a stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrivalEstimate {
    pub route: RouteSummary,

    /// The vehicle chosen for this route; its position is `vehicle.location`.
    pub vehicle: VehicleFix,

    /// Travel distance along the route path, in metres.
    pub distance_m: f64,

    /// Estimated travel time in minutes.
    pub estimated_minutes: f64,
}

impl ArrivalEstimate {
    /// Estimated travel time as a `Duration`, saturating at `Duration::MAX`.
    pub fn eta(&self) -> Duration {
        Duration::try_from_secs_f64((self.estimated_minutes * 60.0).max(0.0))
            .unwrap_or(Duration::MAX)
    }
}

/// Sort estimates by ascending travel distance.
///
/// Stable: estimates with equal distance keep their route order.
pub fn sort_by_distance(estimates: &mut [ArrivalEstimate]) {
    estimates.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CrowdLevel, RouteId};
    use crate::geo::Coordinate;

    fn estimate(route: &str, distance_m: f64) -> ArrivalEstimate {
        ArrivalEstimate {
            route: RouteSummary {
                id: RouteId::parse(route).unwrap(),
                full_name: String::new(),
                short_name: route.to_string(),
                origin: String::new(),
            },
            vehicle: VehicleFix {
                plate: format!("V{route}"),
                bearing: 0.0,
                location: Coordinate::new(1.33, 103.69),
                crowd_level: CrowdLevel::Low,
            },
            distance_m,
            estimated_minutes: distance_m / 60.0,
        }
    }

    #[test]
    fn eta_converts_minutes() {
        let e = estimate("A", 300.0);
        assert_eq!(e.eta(), Duration::from_secs(300));
    }

    #[test]
    fn eta_saturates_when_too_large() {
        let mut e = estimate("A", 300.0);
        e.estimated_minutes = 2.62e22;
        assert_eq!(e.eta(), Duration::MAX);
    }

    #[test]
    fn sort_orders_by_distance_stably() {
        let mut v = vec![
            estimate("A", 700.0),
            estimate("B", 100.0),
            estimate("C", 700.0),
            estimate("D", 250.0),
        ];
        sort_by_distance(&mut v);
        let order: Vec<_> = v.iter().map(|e| e.route.short_name.as_str()).collect();
        assert_eq!(order, ["B", "D", "A", "C"]);
    }
}
