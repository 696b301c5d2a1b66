//! Domain types for arrival estimation.
//!
//! Everything here is built fresh from one provider snapshot per request
//! and read-only afterwards. Identifiers are validated at construction, so
//! code receiving a `StopId` or `RouteId` can put it in a URL safely.

mod arrival;
mod ids;
mod route;
mod vehicle;

pub use arrival::{ArrivalEstimate, sort_by_distance};
pub use ids::{InvalidId, RouteId, StopId};
pub use route::{Route, RouteSummary, Stop};
pub use vehicle::{CrowdLevel, InvalidCrowdLevel, VehicleFix};
