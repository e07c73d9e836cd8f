//! Buses approaching a stop.

use std::sync::Arc;

use crate::identifiers::*;
use crate::live::LiveStatus;
use crate::models::{BusStatus, GeoPoint, Stop};

use super::{BusOnRoute, MatchContext};

/// One (route, bus) pair that can serve the requested stop.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ArrivalResult {
    pub route_id: RouteIdentifier,
    pub route_number: String,
    pub bus_id: BusIdentifier,
    pub registration_number: String,
    pub status: BusStatus,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub position: GeoPoint,
    /// Straight-line distance to the stop, rounded to the meter
    pub distance_meters: u32,
    /// `None` when no ETA can be computed for the configured speed
    pub eta_minutes: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arrivals {
    pub stop: Arc<Stop>,
    pub arrivals: Vec<ArrivalResult>,
}

/// Every active bus on any route that serves `stop`, in either direction.
///
/// Buses that never reported, that have no position yet, or whose trip is
/// ended or inactive are skipped.
pub fn match_arrivals(ctx: &MatchContext<'_>, stop: &Stop) -> Vec<ArrivalResult> {
    let mut results = Vec::new();

    for route in ctx.topology.routes_containing(stop.id) {
        for bus in ctx.topology.buses_on_route(route.id) {
            let Some((live, position)) = active_position(ctx, bus.id) else {
                continue;
            };

            let estimate = ctx.estimate(position, stop.location());
            let row = BusOnRoute::new(&route, &bus);

            results.push(ArrivalResult {
                route_id: row.route_id,
                route_number: row.route_number,
                bus_id: row.bus_id,
                registration_number: row.registration_number,
                status: live.status,
                position,
                distance_meters: estimate.distance_meters,
                eta_minutes: estimate.eta_minutes,
            });
        }
    }

    results
}

pub(super) fn active_position(
    ctx: &MatchContext<'_>,
    bus_id: BusIdentifier,
) -> Option<(LiveStatus, GeoPoint)> {
    let live = ctx.live.active_status(bus_id)?;
    let position = live.position?;
    Some((live, position))
}
