//! Per-day route assignments kept for the admin console.
//!
//! A schedule says which bus and driver work a route on a given date. It is
//! planning data only: live tracking always uses each bus's seeded route.

use chrono::{NaiveDate, NaiveTime};
use dashmap::DashMap;

use crate::identifiers::*;
use crate::models::traits::TopologyProvider;
use crate::models::types::{Result, TransitError};

/// One route worked by one bus and driver for a time window.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct RouteAssignment {
    pub route_id: RouteIdentifier,
    pub bus_id: BusIdentifier,
    pub driver_id: DriverIdentifier,
    #[cfg_attr(feature = "serde", serde(with = "hhmm"))]
    pub start_time: NaiveTime,
    #[cfg_attr(feature = "serde", serde(with = "hhmm"))]
    pub end_time: NaiveTime,
    #[cfg_attr(feature = "serde", serde(default = "default_active"))]
    pub is_active: bool,
}

#[cfg(feature = "serde")]
fn default_active() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteSchedule {
    pub date: NaiveDate,
    pub routes: Vec<RouteAssignment>,
}

impl RouteSchedule {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            routes: Vec::new(),
        }
    }
}

/// Schedules keyed by service date. Replacing a day's schedule is atomic.
#[derive(Debug, Default)]
pub struct ScheduleBook {
    schedules: DashMap<NaiveDate, RouteSchedule>,
}

impl ScheduleBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored schedule, or an empty one if nothing was planned.
    pub fn schedule_for(&self, date: NaiveDate) -> RouteSchedule {
        self.schedules
            .get(&date)
            .map(|s| s.value().clone())
            .unwrap_or_else(|| RouteSchedule::empty(date))
    }

    /// Validate `routes` against `topology` and replace the whole day.
    pub fn replace_schedule(
        &self,
        topology: &dyn TopologyProvider,
        date: NaiveDate,
        routes: Vec<RouteAssignment>,
    ) -> Result<RouteSchedule> {
        for assignment in &routes {
            validate_assignment(topology, assignment)?;
        }

        let schedule = RouteSchedule { date, routes };
        self.schedules.insert(date, schedule.clone());
        Ok(schedule)
    }

    pub fn assignment_for_driver(
        &self,
        date: NaiveDate,
        driver_id: DriverIdentifier,
    ) -> Option<RouteAssignment> {
        self.schedules
            .get(&date)?
            .routes
            .iter()
            .find(|a| a.driver_id == driver_id)
            .cloned()
    }
}

/// The service date after `today`.
pub fn tomorrow(today: NaiveDate) -> Result<NaiveDate> {
    today
        .succ_opt()
        .ok_or_else(|| TransitError::InvalidSchedule(format!("no date follows {today}")))
}

fn validate_assignment(topology: &dyn TopologyProvider, a: &RouteAssignment) -> Result<()> {
    if topology.find_route_by_id(a.route_id).is_none() {
        return Err(TransitError::InvalidSchedule(format!("unknown route {}", a.route_id)));
    }
    if topology.find_bus_by_id(a.bus_id).is_none() {
        return Err(TransitError::InvalidSchedule(format!("unknown bus {}", a.bus_id)));
    }
    if topology.find_driver_by_id(a.driver_id).is_none() {
        return Err(TransitError::InvalidSchedule(format!("unknown driver {}", a.driver_id)));
    }
    if a.start_time >= a.end_time {
        return Err(TransitError::InvalidSchedule(format!(
            "route {} starts at {} but ends at {}",
            a.route_id, a.start_time, a.end_time
        )));
    }
    Ok(())
}

/// `HH:MM` wall-clock times; seconds are accepted on input.
#[cfg(feature = "serde")]
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
