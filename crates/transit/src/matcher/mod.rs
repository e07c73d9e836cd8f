//! Matching live buses against stops and journeys.
//!
//! Both matchers walk topology (stop -> routes -> buses), keep only buses
//! with active live state and a known position, and estimate distance and
//! ETA to a single stop.

pub mod arrivals;
pub mod journey;

pub use arrivals::{match_arrivals, ArrivalResult, Arrivals};
pub use journey::{match_journeys, JourneyOptions, JourneyResult};

use crate::identifiers::*;
use crate::live::LiveStateTable;
use crate::models::{Bus, GeoPoint, Route, TopologyProvider};
use crate::spatial::{estimate_eta_minutes, DistanceEstimator};

/// Everything a matcher reads.
#[derive(Clone, Copy)]
pub struct MatchContext<'a> {
    pub topology: &'a dyn TopologyProvider,
    pub live: &'a LiveStateTable,
    pub estimator: &'a dyn DistanceEstimator,
    pub average_speed_kmph: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Estimate {
    pub distance_meters: u32,
    pub eta_minutes: Option<u32>,
}

impl MatchContext<'_> {
    /// Distance from a bus to a stop and the ETA at the configured speed.
    ///
    /// A degenerate speed leaves `eta_minutes` empty instead of failing the
    /// whole query.
    pub fn estimate(&self, from: GeoPoint, to: GeoPoint) -> Estimate {
        let distance = self.estimator.distance_meters(from, to);
        Estimate {
            distance_meters: distance.max(0.0).round() as u32,
            eta_minutes: estimate_eta_minutes(distance, self.average_speed_kmph).ok(),
        }
    }
}

/// Display fields shared by arrival and journey rows.
pub(crate) struct BusOnRoute {
    pub route_id: RouteIdentifier,
    pub route_number: String,
    pub bus_id: BusIdentifier,
    pub registration_number: String,
}

impl BusOnRoute {
    pub fn new(route: &Route, bus: &Bus) -> Self {
        Self {
            route_id: route.id,
            route_number: route.number.clone(),
            bus_id: bus.id,
            registration_number: bus.registration_number.clone(),
        }
    }
}

/// Stable sort by ETA ascending; rows without an ETA go last.
pub fn sort_by_eta<T>(rows: &mut [T], eta: impl Fn(&T) -> Option<u32>) {
    rows.sort_by_key(|row| match eta(row) {
        Some(minutes) => (false, minutes),
        None => (true, 0),
    });
}
