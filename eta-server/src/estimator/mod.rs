//! Bus arrival estimation.
//!
//! Answers "how far away is the next bus on each route serving this stop,
//! and how long until it gets here?" from a snapshot of routes and live
//! vehicle positions.
//!
//! Each route path is a polyline from the route's origin. Vehicles and stops
//! are placed on it by nearest waypoint plus a betweenness test, and the
//! distance between them is measured along the path rather than as the crow
//! flies. Travel time comes from a per-crowd-level average speed.

mod config;
mod estimate;
mod locate;
mod resolver;


pub use config::{EstimatorConfig, InvalidSpeed, SpeedTable, VehicleSelection};
pub use estimate::{
    ArrivalEstimator, EstimateError, TransitProvider, estimate_route, select_vehicle,
};
pub(crate) use estimate::travel_distance;
pub use locate::{Segment, locating_segment, nearest_waypoint_index};
pub use resolver::{routes_serving_stop, stop_by_id};
