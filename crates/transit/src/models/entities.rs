//! Static fleet records: stops, routes, buses and drivers.
//!
//! All of these are seeded once and never change while the process runs.

use crate::identifiers::*;
use crate::models::types::GeoPoint;

/// A named boarding point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Stop {
    #[cfg_attr(feature = "serde", serde(rename = "stopId"))]
    pub id: StopIdentifier,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Stop {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Key used for name lookups: trimmed and lowercased.
    pub fn lookup_key(&self) -> String {
        normalize_stop_name(&self.name)
    }
}

pub fn normalize_stop_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// An ordered sequence of stops in physical travel order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Route {
    #[cfg_attr(feature = "serde", serde(rename = "routeId"))]
    pub id: RouteIdentifier,
    /// Short display number (e.g. "R1")
    #[cfg_attr(feature = "serde", serde(rename = "routeNumber"))]
    pub number: String,
    #[cfg_attr(feature = "serde", serde(rename = "routeName"))]
    pub name: String,
    pub stops: Vec<StopIdentifier>,
}

impl Route {
    /// Position of `stop` in travel order.
    pub fn stop_index(&self, stop: StopIdentifier) -> Option<usize> {
        self.stops.iter().position(|&s| s == stop)
    }

    /// True when `from` comes strictly before `to` in this route's stop order.
    pub fn runs_between(&self, from: StopIdentifier, to: StopIdentifier) -> bool {
        match (self.stop_index(from), self.stop_index(to)) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }
}

/// A vehicle, permanently bound to one route.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Bus {
    #[cfg_attr(feature = "serde", serde(rename = "busId"))]
    pub id: BusIdentifier,
    pub registration_number: String,
    pub model: String,
    pub capacity: u16,
    pub route_id: RouteIdentifier,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Driver {
    #[cfg_attr(feature = "serde", serde(rename = "driverId"))]
    pub id: DriverIdentifier,
    pub name: String,
    pub username: String,
    pub phone: String,
    pub license: String,
    pub experience_years: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub photo_url: Option<String>,
    pub bus_id: BusIdentifier,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(stops: &[u32]) -> Route {
        Route {
            id: RouteIdentifier::new(1),
            number: "R1".into(),
            name: "Test".into(),
            stops: stops.iter().copied().map(StopIdentifier::new).collect(),
        }
    }

    #[test]
    fn test_route_order() {
        let r = route(&[1, 5, 2]);

        assert_eq!(r.stop_index(StopIdentifier::new(5)), Some(1));
        assert!(r.runs_between(StopIdentifier::new(1), StopIdentifier::new(2)));
        assert!(!r.runs_between(StopIdentifier::new(2), StopIdentifier::new(1)));
        assert!(!r.runs_between(StopIdentifier::new(1), StopIdentifier::new(1)));
        assert!(!r.runs_between(StopIdentifier::new(1), StopIdentifier::new(9)));
    }

    #[test]
    fn test_stop_lookup_key() {
        let stop = Stop {
            id: StopIdentifier::new(2),
            name: "  market Yard ".into(),
            latitude: 17.68,
            longitude: 75.92,
        };
        assert_eq!(stop.lookup_key(), "market yard");
        assert_eq!(normalize_stop_name("MARKET YARD"), stop.lookup_key());
    }
}
