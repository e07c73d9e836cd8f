//! # bus-tracker-transit
//!
//! Live tracking and arrival matching for a small bus fleet.
//!
//! ## Features
//!
//! - **Topology**: immutable stops, routes, buses and drivers with validated seed data
//! - **Live state**: latest position and status per bus, lock-sharded for concurrent writers
//! - **Matching**: which active buses can serve a stop or a same-route journey, with ETAs
//! - **Spatial queries**: nearest stops from an R-tree, Haversine distances
//! - **Schedules**: per-day route assignments for the admin console
//!
//! Nothing here performs I/O or logs; the request layer owns both.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use bus_tracker_transit::prelude::*;
//!
//! let topology = StaticTopology::from_data(
//!     vec![
//!         Stop { id: StopIdentifier::new(1), name: "Kanna Chowk".into(), latitude: 17.6778, longitude: 75.9140 },
//!         Stop { id: StopIdentifier::new(2), name: "Market Yard".into(), latitude: 17.6826, longitude: 75.9269 },
//!     ],
//!     vec![Route {
//!         id: RouteIdentifier::new(1),
//!         number: "R1".into(),
//!         name: "Kanna Chowk -> Market Yard".into(),
//!         stops: vec![StopIdentifier::new(1), StopIdentifier::new(2)],
//!     }],
//!     vec![Bus {
//!         id: BusIdentifier::new(1),
//!         registration_number: "MH-12-AB-1010".into(),
//!         model: "Tata City".into(),
//!         capacity: 40,
//!         route_id: RouteIdentifier::new(1),
//!     }],
//!     vec![],
//! )
//! .unwrap();
//!
//! let tracker = BusTracker::new(Arc::new(topology));
//! tracker
//!     .ingest_position(BusIdentifier::new(1), DriverIdentifier::new(1), GeoPoint::new(17.6778, 75.9140), Some("running"))
//!     .unwrap();
//!
//! let arrivals = tracker.find_arrivals("kanna chowk").unwrap();
//! assert_eq!(arrivals.arrivals.len(), 1);
//! assert_eq!(arrivals.arrivals[0].eta_minutes, Some(0));
//! ```

pub mod identifiers;
pub mod live;
pub mod matcher;
pub mod models;
pub mod provider;
pub mod schedule;
pub mod spatial;
pub mod tracker;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::live::{LiveStateTable, LiveStatus};
    pub use crate::matcher::{sort_by_eta, ArrivalResult, Arrivals, JourneyOptions, JourneyResult};
    pub use crate::models::{entities::*, traits::*, types::*};
    pub use crate::provider::StaticTopology;
    pub use crate::schedule::{tomorrow, RouteAssignment, RouteSchedule, ScheduleBook};
    pub use crate::spatial::{DistanceEstimator, StraightLine};
    pub use crate::tracker::{ActiveBus, BusTracker, NearestRouteStop, TrackerConfig};
}

pub use prelude::*;
