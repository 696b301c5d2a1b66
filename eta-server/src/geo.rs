//! Geographic primitives.
//!
//! Distances are great-circle (haversine) distances in whole metres. The
//! betweenness test works on those rounded distances first and only falls
//! back to a planar dot-product test on raw degrees, which is adequate for
//! the short segments found in a route path.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in decimal degrees.
///
/// Ranges are not validated; the provider is trusted to send sane values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Great-circle distance between two coordinates, rounded to whole metres.
///
/// Symmetric, and zero for identical inputs.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    (EARTH_RADIUS_M * c).round()
}

/// Whether `x` lies on the segment between `a` and `b`.
///
/// Order of `a` and `b` does not matter.
pub fn is_between(a: Coordinate, b: Coordinate, x: Coordinate) -> bool {
    let ab = distance(a, b);
    let ax = distance(a, x);
    let xb = distance(x, b);

    // Colinear within rounding: on the segment, endpoints included.
    if ax + xb == ab {
        return true;
    }
    // Colinear but beyond one end.
    if (ax - xb).abs() == ab {
        return false;
    }

    // Planar fallback on the vectors a->x and x->b. A zero product is
    // treated as "not between".
    let product = (x.lat - a.lat) * (b.lat - x.lat) + (x.lng - a.lng) * (b.lng - x.lng);
    product < 0.0
}
