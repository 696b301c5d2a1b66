//! Web layer for the arrival estimator.
//!
//! Serves the route list, live vehicle positions and arrival estimates as
//! JSON in the same envelope the bus feed uses.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
