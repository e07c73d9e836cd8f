//! Same-route journey options between two stops.
//!
//! A route qualifies only when the source comes strictly before the
//! destination in its stored stop order. Routes are not assumed to run in
//! reverse, and the ETA covers the wait for the bus at the source, not the
//! ride itself.

use std::sync::Arc;

use crate::identifiers::*;
use crate::models::{BusStatus, Stop};

use super::arrivals::active_position;
use super::{BusOnRoute, MatchContext};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct JourneyResult {
    pub route_id: RouteIdentifier,
    pub route_number: String,
    pub bus_id: BusIdentifier,
    pub registration_number: String,
    pub status: BusStatus,
    pub distance_to_source_meters: u32,
    pub eta_to_source_minutes: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JourneyOptions {
    pub source: Arc<Stop>,
    pub destination: Arc<Stop>,
    pub options: Vec<JourneyResult>,
}

pub fn match_journeys(
    ctx: &MatchContext<'_>,
    source: &Stop,
    destination: &Stop,
) -> Vec<JourneyResult> {
    let mut options = Vec::new();

    let candidates = ctx
        .topology
        .routes_containing(source.id)
        .into_iter()
        .filter(|route| route.runs_between(source.id, destination.id));

    for route in candidates {
        for bus in ctx.topology.buses_on_route(route.id) {
            let Some((live, position)) = active_position(ctx, bus.id) else {
                continue;
            };

            let estimate = ctx.estimate(position, source.location());
            let row = BusOnRoute::new(&route, &bus);

            options.push(JourneyResult {
                route_id: row.route_id,
                route_number: row.route_number,
                bus_id: row.bus_id,
                registration_number: row.registration_number,
                status: live.status,
                distance_to_source_meters: estimate.distance_meters,
                eta_to_source_minutes: estimate.eta_minutes,
            });
        }
    }

    options
}
