//! Core traits for fleet topology.
//!
//! The tracker only reads topology through [`TopologyProvider`], so the
//! in-memory store can be replaced by anything that answers the same lookups.

use std::sync::Arc;

use crate::identifiers::*;
use crate::models::entities::{Bus, Driver, Route, Stop};
use crate::models::types::GeoPoint;

/// Read-only view of stops, routes, buses and drivers.
///
/// Lookups return `None` for unknown keys; turning that into a user-facing
/// error is the caller's job.
pub trait TopologyProvider: Send + Sync {
    // ---- Lookups ----
    fn find_stop_by_id(&self, id: StopIdentifier) -> Option<Arc<Stop>>;

    /// Exact match on the trimmed, lowercased name.
    fn find_stop_by_name(&self, name: &str) -> Option<Arc<Stop>>;

    fn find_route_by_id(&self, id: RouteIdentifier) -> Option<Arc<Route>>;
    fn find_bus_by_id(&self, id: BusIdentifier) -> Option<Arc<Bus>>;
    fn find_driver_by_id(&self, id: DriverIdentifier) -> Option<Arc<Driver>>;
    fn find_driver_by_username(&self, username: &str) -> Option<Arc<Driver>>;

    // ---- Relations ----

    /// Routes whose stop sequence includes `stop`, in either direction.
    fn routes_containing(&self, stop: StopIdentifier) -> Vec<Arc<Route>>;

    fn buses_on_route(&self, route: RouteIdentifier) -> Vec<Arc<Bus>>;

    // ---- Collections ----
    fn all_stops(&self) -> Vec<Arc<Stop>>;
    fn all_routes(&self) -> Vec<Arc<Route>>;
    fn all_buses(&self) -> Vec<Arc<Bus>>;
    fn all_drivers(&self) -> Vec<Arc<Driver>>;

    // ---- Spatial queries ----

    /// The `n` stops closest to `point`, nearest first.
    fn nearest_stops(&self, point: GeoPoint, n: usize) -> Vec<Arc<Stop>>;

    /// Stops within `radius_m` meters of `point`.
    fn stops_near(&self, point: GeoPoint, radius_m: f64) -> Vec<Arc<Stop>>;

    /// Resolve a rider's stop query.
    ///
    /// An all-digit query is tried as an id first; if that misses (or the
    /// query is not numeric) it is matched by name.
    fn resolve_stop(&self, query: &str) -> Option<Arc<Stop>> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let by_id = if query.bytes().all(|b| b.is_ascii_digit()) {
            query
                .parse::<StopIdentifier>()
                .ok()
                .and_then(|id| self.find_stop_by_id(id))
        } else {
            None
        };

        by_id.or_else(|| self.find_stop_by_name(query))
    }
}
