//! Rider queries.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use bus_tracker_api_types::{ArrivalsQuery, JourneyQuery, NearestStopsQuery};
use bus_tracker_transit::{Arrivals, JourneyOptions, Stop, sort_by_eta};

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stops", get(stops))
        .route("/stops/nearest", get(nearest_stops))
        .route("/arrivals", get(arrivals))
        .route("/journey", get(journey))
}

async fn stops(State(state): State<AppState>) -> Json<Vec<Arc<Stop>>> {
    Json(state.tracker.stops())
}

async fn nearest_stops(
    State(state): State<AppState>,
    query: Result<Query<NearestStopsQuery>, QueryRejection>,
) -> Result<Json<Vec<Arc<Stop>>>, ApiError> {
    let Query(query) = query?;
    let stops = state
        .tracker
        .nearest_stops(query.position(), query.limit())?;

    Ok(Json(stops))
}

async fn arrivals(
    State(state): State<AppState>,
    query: Result<Query<ArrivalsQuery>, QueryRejection>,
) -> Result<Json<Arrivals>, ApiError> {
    let Query(query) = query?;
    let mut found = state
        .tracker
        .find_arrivals(query.stop.as_deref().unwrap_or_default())?;

    sort_by_eta(&mut found.arrivals, |row| row.eta_minutes);
    Ok(Json(found))
}

async fn journey(
    State(state): State<AppState>,
    query: Result<Query<JourneyQuery>, QueryRejection>,
) -> Result<Json<JourneyOptions>, ApiError> {
    let Query(query) = query?;
    let mut found = state.tracker.find_journey_options(
        query.source.as_deref().unwrap_or_default(),
        query.destination.as_deref().unwrap_or_default(),
    )?;

    sort_by_eta(&mut found.options, |row| row.eta_to_source_minutes);
    Ok(Json(found))
}
