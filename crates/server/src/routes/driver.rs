//! Reports sent from the driver app.
//!
//! The driver in the path decides which bus is updated; the bus's seeded
//! route is recorded with every report.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use bus_tracker_api_types::{
    AssignmentQuery, EmergencyRequest, EndTripResponse, LivePositionRequest,
};
use bus_tracker_transit::{DriverIdentifier, LiveStatus, RouteAssignment, tomorrow};
use chrono::Utc;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{driver_id}/live", post(live))
        .route("/{driver_id}/emergency", post(emergency))
        .route("/{driver_id}/end-trip", post(end_trip))
        .route("/{driver_id}/assignment", get(assignment))
}

async fn live(
    State(state): State<AppState>,
    path: Result<Path<DriverIdentifier>, PathRejection>,
    payload: Result<Json<LivePositionRequest>, JsonRejection>,
) -> Result<Json<LiveStatus>, ApiError> {
    let Path(driver_id) = path?;
    let Json(body) = payload?;
    let bus_id = state.bus_for_driver(driver_id)?;

    let saved = state.tracker.ingest_position(
        bus_id,
        driver_id,
        body.position(),
        body.status.as_deref(),
    )?;
    tracing::info!(bus = %bus_id, driver = %driver_id, status = %saved.status, "position report");

    Ok(Json(saved))
}

async fn emergency(
    State(state): State<AppState>,
    path: Result<Path<DriverIdentifier>, PathRejection>,
    payload: Result<Json<EmergencyRequest>, JsonRejection>,
) -> Result<Json<LiveStatus>, ApiError> {
    let Path(driver_id) = path?;
    let Json(body) = payload?;
    let bus_id = state.bus_for_driver(driver_id)?;

    let saved = state
        .tracker
        .ingest_emergency(bus_id, driver_id, &body.issue, body.position())?;
    tracing::warn!(bus = %bus_id, driver = %driver_id, issue = %body.issue, "emergency reported");

    Ok(Json(saved))
}

async fn end_trip(
    State(state): State<AppState>,
    path: Result<Path<DriverIdentifier>, PathRejection>,
) -> Result<Json<EndTripResponse>, ApiError> {
    let Path(driver_id) = path?;
    let bus_id = state.bus_for_driver(driver_id)?;

    let saved = state.tracker.end_trip(bus_id, driver_id)?;
    tracing::info!(bus = %bus_id, driver = %driver_id, "trip ended");

    Ok(Json(EndTripResponse::new(saved)))
}

/// The driver's scheduled route for a day, `null` when unassigned.
async fn assignment(
    State(state): State<AppState>,
    path: Result<Path<DriverIdentifier>, PathRejection>,
    query: Result<Query<AssignmentQuery>, QueryRejection>,
) -> Result<Json<Option<RouteAssignment>>, ApiError> {
    let Path(driver_id) = path?;
    let Query(query) = query?;
    state.bus_for_driver(driver_id)?;

    let date = match query.date {
        Some(date) => date,
        None => tomorrow(Utc::now().date_naive())?,
    };

    Ok(Json(state.tracker.assignment_for_driver(date, driver_id)))
}
