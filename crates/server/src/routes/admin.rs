//! Admin console: live fleet view and next-day planning.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::get;
use axum::{Json, Router};
use bus_tracker_api_types::{
    AvailableResources, BusSummary, RouteSummary, ScheduleUpdateRequest, ScheduleView,
};
use bus_tracker_transit::{ActiveBus, RouteSchedule, tomorrow};
use chrono::{NaiveDate, Utc};

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/active-buses", get(active_buses))
        .route(
            "/tomorrow-schedule",
            get(tomorrow_schedule).post(replace_tomorrow_schedule),
        )
        .route("/available-resources", get(available_resources))
}

fn tomorrow_utc() -> Result<NaiveDate, ApiError> {
    Ok(tomorrow(Utc::now().date_naive())?)
}

async fn active_buses(State(state): State<AppState>) -> Json<Vec<ActiveBus>> {
    let mut buses = state.tracker.list_active_buses();
    buses.sort_by_key(|bus| bus.status.bus_id);
    Json(buses)
}

async fn tomorrow_schedule(State(state): State<AppState>) -> Result<Json<ScheduleView>, ApiError> {
    let schedule = state.tracker.schedule_for(tomorrow_utc()?);
    let topology = state.topology();

    Ok(Json(ScheduleView::build(
        schedule,
        |id| topology.find_bus_by_id(id).as_deref().cloned(),
        |id| topology.find_route_by_id(id).as_deref().cloned(),
        |id| topology.find_driver_by_id(id).as_deref().cloned(),
    )))
}

async fn replace_tomorrow_schedule(
    State(state): State<AppState>,
    payload: Result<Json<ScheduleUpdateRequest>, JsonRejection>,
) -> Result<Json<RouteSchedule>, ApiError> {
    let Json(body) = payload?;
    let date = tomorrow_utc()?;

    let saved = state.tracker.replace_schedule(date, body.routes)?;
    tracing::info!(%date, assignments = saved.routes.len(), "schedule replaced");

    Ok(Json(saved))
}

async fn available_resources(State(state): State<AppState>) -> Json<AvailableResources> {
    let topology = state.topology();

    Json(AvailableResources {
        buses: topology
            .all_buses()
            .iter()
            .map(|bus| BusSummary::from(bus.as_ref()))
            .collect(),
        routes: topology
            .all_routes()
            .iter()
            .map(|route| RouteSummary::from(route.as_ref()))
            .collect(),
        drivers: topology
            .all_drivers()
            .iter()
            .map(|driver| driver.as_ref().clone())
            .collect(),
    })
}
