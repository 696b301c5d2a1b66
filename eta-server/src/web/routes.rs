//! HTTP route handlers.

use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::domain::{InvalidId, RouteId, StopId, sort_by_distance};
use crate::estimator::{ArrivalEstimator, EstimateError, TransitProvider};
use crate::provider::ProviderError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
///
/// Requests running longer than `request_timeout` are answered with 408.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/busLines", get(bus_lines))
        .route("/api/busPosition/:route_id", get(bus_positions))
        .route("/api/busStop/:stop_id", get(arrivals))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// All routes with their stops and paths.
async fn bus_lines(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<RouteResult>>>, AppError> {
    let routes = state.provider.fetch_routes().await?;
    let payload = routes.iter().map(RouteResult::from).collect();
    Ok(Json(Envelope::success(payload)))
}

/// Current vehicle positions on one route.
async fn bus_positions(
    State(state): State<AppState>,
    Path(route_id): Path<String>,
) -> Result<Json<Envelope<Vec<PositionResult>>>, AppError> {
    let route_id = RouteId::parse(&route_id)?;
    let fixes = state.provider.fetch_vehicle_fixes(&route_id).await?;
    let payload = fixes.iter().map(PositionResult::from).collect();
    Ok(Json(Envelope::success(payload)))
}

/// Estimated arrivals at a stop, one per route with a vehicle on the way.
async fn arrivals(
    State(state): State<AppState>,
    Path(stop_id): Path<String>,
    Query(query): Query<ArrivalQuery>,
) -> Result<Json<Envelope<Vec<ArrivalResult>>>, AppError> {
    let stop_id = StopId::parse(&stop_id)?;

    let mut estimates = ArrivalEstimator::new(state.provider.as_ref(), &state.config)
        .estimate(&stop_id)
        .await?;

    if query.sort_by_distance() {
        sort_by_distance(&mut estimates);
    }

    info!(stop = %stop_id, arrivals = estimates.len(), "Estimated arrivals");

    let payload = estimates.iter().map(ArrivalResult::from).collect();
    Ok(Json(Envelope::success(payload)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    BadGateway { message: String },
}

impl From<InvalidId> for AppError {
    fn from(e: InvalidId) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        AppError::BadGateway {
            message: e.to_string(),
        }
    }
}

impl From<EstimateError> for AppError {
    fn from(e: EstimateError) -> Self {
        match e {
            EstimateError::StopNotFound(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            EstimateError::Provider(inner) => inner.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
        };

        warn!(status = status.as_u16(), %message, "Request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
