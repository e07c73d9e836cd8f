//! Response bodies that are not core types.
//!
//! Arrivals, journeys, stops and live statuses go out as the core's own
//! serde representation; this module only adds envelopes and admin views.

use bus_tracker_transit::{
    Bus, BusIdentifier, Driver, DriverIdentifier, LiveStatus, Route, RouteAssignment,
    RouteIdentifier, RouteSchedule,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EndTripResponse {
    pub message: String,
    pub status: LiveStatus,
}

impl EndTripResponse {
    pub fn new(status: LiveStatus) -> Self {
        Self {
            message: "Trip ended successfully".to_owned(),
            status,
        }
    }
}

/// A schedule with each assignment joined to its records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleView {
    pub date: NaiveDate,
    pub routes: Vec<ScheduleEntryView>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntryView {
    #[serde(flatten)]
    pub assignment: RouteAssignment,
    pub bus: Option<Bus>,
    pub route: Option<Route>,
    pub driver: Option<Driver>,
}

impl ScheduleView {
    /// Join every assignment in `schedule`; records the closures miss stay `None`.
    pub fn build(
        schedule: RouteSchedule,
        bus: impl Fn(BusIdentifier) -> Option<Bus>,
        route: impl Fn(RouteIdentifier) -> Option<Route>,
        driver: impl Fn(DriverIdentifier) -> Option<Driver>,
    ) -> Self {
        let routes = schedule
            .routes
            .into_iter()
            .map(|assignment| ScheduleEntryView {
                bus: bus(assignment.bus_id),
                route: route(assignment.route_id),
                driver: driver(assignment.driver_id),
                assignment,
            })
            .collect();

        Self {
            date: schedule.date,
            routes,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusSummary {
    pub bus_id: BusIdentifier,
    pub registration_number: String,
    pub model: String,
}

impl From<&Bus> for BusSummary {
    fn from(bus: &Bus) -> Self {
        Self {
            bus_id: bus.id,
            registration_number: bus.registration_number.clone(),
            model: bus.model.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub route_id: RouteIdentifier,
    pub route_number: String,
    pub route_name: String,
}

impl From<&Route> for RouteSummary {
    fn from(route: &Route) -> Self {
        Self {
            route_id: route.id,
            route_number: route.number.clone(),
            route_name: route.name.clone(),
        }
    }
}

/// Everything an admin can put into a schedule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AvailableResources {
    pub buses: Vec<BusSummary>,
    pub routes: Vec<RouteSummary>,
    pub drivers: Vec<Driver>,
}
