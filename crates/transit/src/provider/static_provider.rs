//! In-memory topology store built from seed data.
//!
//! Everything is validated and indexed once in [`StaticTopology::from_data`];
//! afterwards the store is immutable and cheap to share.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rstar::RTree;

use crate::identifiers::*;
use crate::models::{entities::*, traits::*, types::*};
use crate::spatial::index::{search_radius_degrees, StopNode};
use crate::spatial::queries::haversine_distance;

/// In-memory topology with lookup maps and a stop R-tree.
///
/// This type is cheap to clone since all data is stored in `Arc`s.
#[derive(Clone)]
pub struct StaticTopology {
    // Core data, in seed order
    stops: Vec<Arc<Stop>>,
    routes: Vec<Arc<Route>>,
    buses: Vec<Arc<Bus>>,
    drivers: Vec<Arc<Driver>>,

    // Lookup maps
    stop_map: HashMap<StopIdentifier, Arc<Stop>>,
    stop_name_map: HashMap<String, Arc<Stop>>,
    route_map: HashMap<RouteIdentifier, Arc<Route>>,
    bus_map: HashMap<BusIdentifier, Arc<Bus>>,
    driver_map: HashMap<DriverIdentifier, Arc<Driver>>,
    driver_username_map: HashMap<String, Arc<Driver>>,

    // Relations
    routes_by_stop: HashMap<StopIdentifier, Vec<Arc<Route>>>,
    buses_by_route: HashMap<RouteIdentifier, Vec<Arc<Bus>>>,

    // Spatial index
    stop_tree: RTree<StopNode>,
}

impl StaticTopology {
    /// Create a new empty topology
    pub fn new() -> Self {
        Self {
            stops: Vec::new(),
            routes: Vec::new(),
            buses: Vec::new(),
            drivers: Vec::new(),
            stop_map: HashMap::new(),
            stop_name_map: HashMap::new(),
            route_map: HashMap::new(),
            bus_map: HashMap::new(),
            driver_map: HashMap::new(),
            driver_username_map: HashMap::new(),
            routes_by_stop: HashMap::new(),
            buses_by_route: HashMap::new(),
            stop_tree: RTree::new(),
        }
    }

    /// Build and validate a topology from raw seed records.
    ///
    /// Fails with `InvalidData` on duplicate ids or names, a route that
    /// repeats or references an unknown stop, a bus on an unknown route, or a
    /// driver assigned to an unknown bus.
    pub fn from_data(
        stops: Vec<Stop>,
        routes: Vec<Route>,
        buses: Vec<Bus>,
        drivers: Vec<Driver>,
    ) -> Result<Self> {
        let stops: Vec<Arc<Stop>> = stops.into_iter().map(Arc::new).collect();
        let routes: Vec<Arc<Route>> = routes.into_iter().map(Arc::new).collect();
        let buses: Vec<Arc<Bus>> = buses.into_iter().map(Arc::new).collect();
        let drivers: Vec<Arc<Driver>> = drivers.into_iter().map(Arc::new).collect();

        // Build lookup maps
        let stop_map = index_unique(&stops, |s| s.id, "stop")?;
        let stop_name_map = index_unique(&stops, |s| s.lookup_key(), "stop name")?;
        let route_map = index_unique(&routes, |r| r.id, "route")?;
        let bus_map = index_unique(&buses, |b| b.id, "bus")?;
        let driver_map = index_unique(&drivers, |d| d.id, "driver")?;
        let driver_username_map =
            index_unique(&drivers, |d| d.username.clone(), "driver username")?;

        for stop in &stops {
            stop.location().validated().map_err(|_| {
                TransitError::InvalidData(format!("stop {} has invalid coordinates", stop.id))
            })?;
        }

        let mut routes_by_stop: HashMap<StopIdentifier, Vec<Arc<Route>>> = HashMap::new();
        for route in &routes {
            let mut seen = HashSet::new();
            for &stop_id in &route.stops {
                if !stop_map.contains_key(&stop_id) {
                    return Err(TransitError::InvalidData(format!(
                        "route {} references unknown stop {}",
                        route.id, stop_id
                    )));
                }
                if !seen.insert(stop_id) {
                    return Err(TransitError::InvalidData(format!(
                        "route {} visits stop {} more than once",
                        route.id, stop_id
                    )));
                }
                routes_by_stop.entry(stop_id).or_default().push(route.clone());
            }
        }

        let mut buses_by_route: HashMap<RouteIdentifier, Vec<Arc<Bus>>> = HashMap::new();
        for bus in &buses {
            if !route_map.contains_key(&bus.route_id) {
                return Err(TransitError::InvalidData(format!(
                    "bus {} is assigned to unknown route {}",
                    bus.id, bus.route_id
                )));
            }
            buses_by_route.entry(bus.route_id).or_default().push(bus.clone());
        }

        for driver in &drivers {
            if !bus_map.contains_key(&driver.bus_id) {
                return Err(TransitError::InvalidData(format!(
                    "driver {} is assigned to unknown bus {}",
                    driver.id, driver.bus_id
                )));
            }
        }

        // Build spatial index
        let stop_tree = RTree::bulk_load(stops.iter().cloned().map(StopNode::new).collect());

        Ok(Self {
            stops,
            routes,
            buses,
            drivers,
            stop_map,
            stop_name_map,
            route_map,
            bus_map,
            driver_map,
            driver_username_map,
            routes_by_stop,
            buses_by_route,
            stop_tree,
        })
    }
}

fn index_unique<T, K, F>(items: &[Arc<T>], key: F, what: &str) -> Result<HashMap<K, Arc<T>>>
where
    K: std::hash::Hash + Eq + std::fmt::Display,
    F: Fn(&T) -> K,
{
    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        let k = key(item);
        if map.contains_key(&k) {
            return Err(TransitError::InvalidData(format!("duplicate {what}: {k}")));
        }
        map.insert(k, item.clone());
    }
    Ok(map)
}

impl Default for StaticTopology {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologyProvider for StaticTopology {
    fn find_stop_by_id(&self, id: StopIdentifier) -> Option<Arc<Stop>> {
        self.stop_map.get(&id).cloned()
    }

    fn find_stop_by_name(&self, name: &str) -> Option<Arc<Stop>> {
        self.stop_name_map.get(&normalize_stop_name(name)).cloned()
    }

    fn find_route_by_id(&self, id: RouteIdentifier) -> Option<Arc<Route>> {
        self.route_map.get(&id).cloned()
    }

    fn find_bus_by_id(&self, id: BusIdentifier) -> Option<Arc<Bus>> {
        self.bus_map.get(&id).cloned()
    }

    fn find_driver_by_id(&self, id: DriverIdentifier) -> Option<Arc<Driver>> {
        self.driver_map.get(&id).cloned()
    }

    fn find_driver_by_username(&self, username: &str) -> Option<Arc<Driver>> {
        self.driver_username_map.get(username).cloned()
    }

    fn routes_containing(&self, stop: StopIdentifier) -> Vec<Arc<Route>> {
        self.routes_by_stop.get(&stop).cloned().unwrap_or_default()
    }

    fn buses_on_route(&self, route: RouteIdentifier) -> Vec<Arc<Bus>> {
        self.buses_by_route.get(&route).cloned().unwrap_or_default()
    }

    fn all_stops(&self) -> Vec<Arc<Stop>> {
        self.stops.clone()
    }

    fn all_routes(&self) -> Vec<Arc<Route>> {
        self.routes.clone()
    }

    fn all_buses(&self) -> Vec<Arc<Bus>> {
        self.buses.clone()
    }

    fn all_drivers(&self) -> Vec<Arc<Driver>> {
        self.drivers.clone()
    }

    fn nearest_stops(&self, point: GeoPoint, n: usize) -> Vec<Arc<Stop>> {
        // Exact scan: degree-space R-tree order is not distance order away
        // from the equator, and a fleet has few enough stops.
        let mut ranked: Vec<(f64, &Arc<Stop>)> = self
            .stops
            .iter()
            .map(|stop| (haversine_distance(point, stop.location()), stop))
            .collect();

        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.into_iter().take(n).map(|(_, stop)| stop.clone()).collect()
    }

    fn stops_near(&self, point: GeoPoint, radius_m: f64) -> Vec<Arc<Stop>> {
        // Validate radius is positive
        if radius_m <= 0.0 || !radius_m.is_finite() {
            return Vec::new();
        }

        let radius_deg = search_radius_degrees(radius_m, point.latitude);
        self.stop_tree
            .locate_within_distance([point.longitude, point.latitude], radius_deg * radius_deg)
            .filter(|node| haversine_distance(point, node.stop.location()) <= radius_m)
            .map(|node| node.stop.clone())
            .collect()
    }
}
