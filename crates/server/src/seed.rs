//! Fleet records loaded at startup.

use std::path::Path;

use bus_tracker_transit::{Bus, Driver, Route, StaticTopology, Stop};
use eyre::WrapErr;
use serde::Deserialize;

const EMBEDDED_SEED: &str = include_str!("../data/seed.json");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedData {
    pub stops: Vec<Stop>,
    pub routes: Vec<Route>,
    pub buses: Vec<Bus>,
    #[serde(default)]
    pub drivers: Vec<Driver>,
}

impl SeedData {
    pub fn embedded() -> eyre::Result<Self> {
        serde_json::from_str(EMBEDDED_SEED).wrap_err("built-in seed data is malformed")
    }

    pub fn from_path(path: &Path) -> eyre::Result<Self> {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read seed file {}", path.display()))?;
        serde_json::from_str(&text)
            .wrap_err_with(|| format!("failed to parse seed file {}", path.display()))
    }

    pub fn into_topology(self) -> eyre::Result<StaticTopology> {
        StaticTopology::from_data(self.stops, self.routes, self.buses, self.drivers)
            .wrap_err("seed data failed validation")
    }
}

/// Read `path`, or the built-in network when `None`, and index it.
pub fn load(path: Option<&Path>) -> eyre::Result<StaticTopology> {
    let seed = match path {
        Some(path) => SeedData::from_path(path)?,
        None => SeedData::embedded()?,
    };
    seed.into_topology()
}

#[cfg(test)]
mod tests {
    use bus_tracker_transit::{BusIdentifier, RouteIdentifier, TopologyProvider};

    use super::*;

    #[test]
    fn test_embedded_seed() {
        let topology = load(None).unwrap();

        assert_eq!(topology.all_stops().len(), 6);
        assert_eq!(topology.all_routes().len(), 3);
        assert_eq!(topology.all_buses().len(), 4);
        assert_eq!(topology.all_drivers().len(), 4);

        let bus = topology.find_bus_by_id(BusIdentifier::new(3)).unwrap();
        assert_eq!(bus.route_id, RouteIdentifier::new(2));
        assert_eq!(
            topology.find_driver_by_username("driver4").unwrap().bus_id,
            BusIdentifier::new(4)
        );
    }

    #[test]
    fn test_invalid_seed_is_rejected() {
        let seed: SeedData = serde_json::from_str(
            r#"{
                "stops": [{"stopId": 1, "name": "Depot", "latitude": 17.6, "longitude": 75.9}],
                "routes": [],
                "buses": [{"busId": 1, "registrationNumber": "X", "model": "Y", "capacity": 10, "routeId": 7}]
            }"#,
        )
        .unwrap();

        assert!(seed.into_topology().is_err());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let res = serde_json::from_str::<SeedData>(
            r#"{"stops": [], "routes": [], "buses": [], "depots": []}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load(Some(Path::new("/nonexistent/seed.json"))).err().unwrap();
        assert!(err.to_string().contains("failed to read seed file"));
    }
}
