//! Bus arrival estimation server.
//!
//! A web service that answers: "How far away is the next bus on each route
//! serving this stop, and when will it get here?"

pub mod cache;
pub mod config;
pub mod domain;
pub mod estimator;
pub mod geo;
pub mod provider;
pub mod web;
