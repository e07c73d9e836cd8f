//! The tracking engine: topology, live state and matchers behind one handle.
//!
//! [`BusTracker`] is `Send + Sync`; share it behind an `Arc` and call it from
//! any number of request handlers.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::identifiers::*;
use crate::live::{LiveStateTable, LiveStatus};
use crate::matcher::{match_arrivals, match_journeys, Arrivals, JourneyOptions, MatchContext};
use crate::models::{
    Bus, BusStatus, GeoPoint, IssueCode, Result, Route, Stop, TopologyProvider, TransitError,
};
use crate::schedule::{RouteAssignment, RouteSchedule, ScheduleBook};
use crate::spatial::{
    haversine_distance, DistanceEstimator, StraightLine, DEFAULT_AVERAGE_SPEED_KMPH,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackerConfig {
    /// Assumed constant bus speed used for every ETA
    pub average_speed_kmph: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            average_speed_kmph: DEFAULT_AVERAGE_SPEED_KMPH,
        }
    }
}

/// Closest stop on a bus's own route to its last position.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct NearestRouteStop {
    pub stop_id: StopIdentifier,
    pub name: String,
    /// Position of the stop in the route's travel order
    pub index: usize,
    pub distance_meters: u32,
}

/// A live entry joined with the display fields of its bus and route.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ActiveBus {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub status: LiveStatus,
    pub registration_number: Option<String>,
    pub route_number: Option<String>,
    pub route_name: Option<String>,
    pub nearest_stop: Option<NearestRouteStop>,
}

pub struct BusTracker {
    topology: Arc<dyn TopologyProvider>,
    estimator: Arc<dyn DistanceEstimator>,
    live: LiveStateTable,
    schedules: ScheduleBook,
    config: TrackerConfig,
}

impl BusTracker {
    pub fn new(topology: Arc<dyn TopologyProvider>) -> Self {
        Self {
            topology,
            estimator: Arc::new(StraightLine),
            live: LiveStateTable::new(),
            schedules: ScheduleBook::new(),
            config: TrackerConfig::default(),
        }
    }

    pub fn with_estimator(mut self, estimator: Arc<dyn DistanceEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn topology(&self) -> &dyn TopologyProvider {
        self.topology.as_ref()
    }

    pub fn config(&self) -> TrackerConfig {
        self.config
    }

    // ---- Driver side ----

    /// Record a position report for `bus_id`.
    ///
    /// `status` is taken verbatim when it names a known state and otherwise
    /// recorded as running. The route comes from the bus's assignment.
    pub fn ingest_position(
        &self,
        bus_id: BusIdentifier,
        driver_id: DriverIdentifier,
        position: GeoPoint,
        status: Option<&str>,
    ) -> Result<LiveStatus> {
        let position = position.validated()?;
        let bus = self.bus(bus_id)?;
        let status = BusStatus::parse_or_default(status);

        Ok(self
            .live
            .record_position(bus.id, driver_id, bus.route_id, position, status))
    }

    /// Flag the bus as delayed with `issue_code`.
    ///
    /// Unknown issue codes and half-given or invalid coordinates are rejected
    /// before anything is written.
    pub fn ingest_emergency(
        &self,
        bus_id: BusIdentifier,
        driver_id: DriverIdentifier,
        issue_code: &str,
        position: Option<GeoPoint>,
    ) -> Result<LiveStatus> {
        let issue: IssueCode = issue_code.parse()?;
        let position = position.map(GeoPoint::validated).transpose()?;
        let bus = self.bus(bus_id)?;

        Ok(self
            .live
            .record_emergency(bus.id, driver_id, bus.route_id, issue, position))
    }

    pub fn end_trip(
        &self,
        bus_id: BusIdentifier,
        driver_id: DriverIdentifier,
    ) -> Result<LiveStatus> {
        let bus = self.bus(bus_id)?;
        Ok(self.live.end_trip(bus.id, driver_id, bus.route_id))
    }

    pub fn get_status(&self, bus_id: BusIdentifier) -> Option<LiveStatus> {
        self.live.get_status(bus_id)
    }

    // ---- Rider side ----

    pub fn stops(&self) -> Vec<Arc<Stop>> {
        self.topology.all_stops()
    }

    pub fn nearest_stops(&self, position: GeoPoint, n: usize) -> Result<Vec<Arc<Stop>>> {
        Ok(self.topology.nearest_stops(position.validated()?, n))
    }

    /// Raw active entries, unordered.
    pub fn active_statuses(&self) -> Vec<LiveStatus> {
        self.live.list_active()
    }

    /// Active entries joined with bus and route display fields, unordered.
    pub fn list_active_buses(&self) -> Vec<ActiveBus> {
        self.live
            .list_active()
            .into_iter()
            .map(|status| {
                let bus = self.topology.find_bus_by_id(status.bus_id);
                let route = self.topology.find_route_by_id(status.route_id);
                let nearest_stop = match (&route, status.position) {
                    (Some(route), Some(position)) => self.nearest_route_stop(route, position),
                    _ => None,
                };

                ActiveBus {
                    registration_number: bus.map(|b| b.registration_number.clone()),
                    route_number: route.as_ref().map(|r| r.number.clone()),
                    route_name: route.as_ref().map(|r| r.name.clone()),
                    nearest_stop,
                    status,
                }
            })
            .collect()
    }

    /// Active buses that can reach the stop named or numbered by `stop_query`.
    pub fn find_arrivals(&self, stop_query: &str) -> Result<Arrivals> {
        let stop = self
            .topology
            .resolve_stop(stop_query)
            .ok_or_else(|| TransitError::StopNotFound(stop_query.trim().to_owned()))?;

        let arrivals = match_arrivals(&self.match_context(), &stop);
        Ok(Arrivals { stop, arrivals })
    }

    /// Same-route options from `source_query` to `destination_query`.
    pub fn find_journey_options(
        &self,
        source_query: &str,
        destination_query: &str,
    ) -> Result<JourneyOptions> {
        let source = self.topology.resolve_stop(source_query);
        let destination = self.topology.resolve_stop(destination_query);

        let (Some(source), Some(destination)) = (source, destination) else {
            return Err(TransitError::InvalidJourneyEndpoints {
                source_query: source_query.trim().to_owned(),
                destination_query: destination_query.trim().to_owned(),
            });
        };

        let options = match_journeys(&self.match_context(), &source, &destination);
        Ok(JourneyOptions {
            source,
            destination,
            options,
        })
    }

    // ---- Admin side ----

    pub fn schedule_for(&self, date: NaiveDate) -> RouteSchedule {
        self.schedules.schedule_for(date)
    }

    pub fn replace_schedule(
        &self,
        date: NaiveDate,
        routes: Vec<RouteAssignment>,
    ) -> Result<RouteSchedule> {
        self.schedules
            .replace_schedule(self.topology.as_ref(), date, routes)
    }

    pub fn assignment_for_driver(
        &self,
        date: NaiveDate,
        driver_id: DriverIdentifier,
    ) -> Option<RouteAssignment> {
        self.schedules.assignment_for_driver(date, driver_id)
    }

    fn bus(&self, bus_id: BusIdentifier) -> Result<Arc<Bus>> {
        self.topology
            .find_bus_by_id(bus_id)
            .ok_or(TransitError::BusNotFound(bus_id))
    }

    fn match_context(&self) -> MatchContext<'_> {
        MatchContext {
            topology: self.topology.as_ref(),
            live: &self.live,
            estimator: self.estimator.as_ref(),
            average_speed_kmph: self.config.average_speed_kmph,
        }
    }

    fn nearest_route_stop(&self, route: &Route, position: GeoPoint) -> Option<NearestRouteStop> {
        route
            .stops
            .iter()
            .enumerate()
            .filter_map(|(index, &id)| {
                let stop = self.topology.find_stop_by_id(id)?;
                Some((index, haversine_distance(position, stop.location()), stop))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, distance, stop)| NearestRouteStop {
                stop_id: stop.id,
                name: stop.name.clone(),
                index,
                distance_meters: distance.round() as u32,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::sort_by_eta;
    use crate::models::ErrorKind;
    use crate::provider::static_provider::fixtures::{self, solapur};
    use crate::provider::StaticTopology;

    const BUS_1: BusIdentifier = BusIdentifier::new(1);
    const DRIVER_1: DriverIdentifier = DriverIdentifier::new(1);

    fn tracker() -> BusTracker {
        BusTracker::new(Arc::new(solapur()))
    }

    fn two_stop_tracker() -> BusTracker {
        let topology = StaticTopology::from_data(
            vec![
                fixtures::stop(1, "kanna chowk", 17.6778, 75.9140),
                fixtures::stop(2, "market yard", 17.6826, 75.9269),
            ],
            vec![fixtures::route(1, "R1", &[1, 2])],
            vec![fixtures::bus(1, 1)],
            vec![fixtures::driver(1, 1)],
        )
        .unwrap();
        BusTracker::new(Arc::new(topology))
    }

    #[test]
    fn test_ingest_position_normalizes_status() {
        let tracker = tracker();
        let at = GeoPoint::new(17.68, 75.91);

        for (raw, expected) in [
            (Some("running"), BusStatus::Running),
            (Some("delayed"), BusStatus::Delay),
            (Some("inactive"), BusStatus::Inactive),
            (Some("warp_speed"), BusStatus::Running),
            (None, BusStatus::Running),
        ] {
            let saved = tracker.ingest_position(BUS_1, DRIVER_1, at, raw).unwrap();
            assert_eq!(saved.status, expected);

            let fetched = tracker.get_status(BUS_1).unwrap();
            assert_eq!(fetched.position, Some(at));
            assert_eq!(fetched.status, expected);
            assert_eq!(fetched.route_id, RouteIdentifier::new(1));
        }
    }

    #[test]
    fn test_ingest_position_rejects_bad_input() {
        let tracker = tracker();

        let err = tracker
            .ingest_position(BUS_1, DRIVER_1, GeoPoint::new(f64::NAN, 75.0), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = tracker
            .ingest_position(BusIdentifier::new(99), DRIVER_1, GeoPoint::new(17.0, 75.0), None)
            .unwrap_err();
        assert!(matches!(err, TransitError::BusNotFound(_)));

        assert!(tracker.get_status(BUS_1).is_none());
        assert!(tracker.get_status(BusIdentifier::new(99)).is_none());
    }

    #[test]
    fn test_emergency_without_coordinates_keeps_position() {
        let tracker = tracker();
        let at = GeoPoint::new(17.6790, 75.9000);
        tracker.ingest_position(BUS_1, DRIVER_1, at, Some("running")).unwrap();

        let updated = tracker
            .ingest_emergency(BUS_1, DRIVER_1, "other_issue", None)
            .unwrap();

        assert_eq!(updated.position, Some(at));
        assert_eq!(updated.status, BusStatus::Delay);
        assert_eq!(updated.issue, Some(IssueCode::OtherIssue));
    }

    #[test]
    fn test_emergency_rejects_unknown_issue_without_writing() {
        let tracker = tracker();
        tracker
            .ingest_position(BUS_1, DRIVER_1, GeoPoint::new(17.68, 75.91), Some("running"))
            .unwrap();

        let err = tracker
            .ingest_emergency(BUS_1, DRIVER_1, "aliens", None)
            .unwrap_err();

        assert!(matches!(err, TransitError::InvalidIssueCode(_)));
        assert_eq!(tracker.get_status(BUS_1).unwrap().status, BusStatus::Running);
    }

    #[test]
    fn test_end_trip_hides_bus_everywhere() {
        let tracker = tracker();
        tracker
            .ingest_position(BUS_1, DRIVER_1, GeoPoint::new(17.6777933, 75.9139568), None)
            .unwrap();
        assert_eq!(tracker.list_active_buses().len(), 1);

        let ended = tracker.end_trip(BUS_1, DRIVER_1).unwrap();
        assert_eq!(ended.status, BusStatus::TripEnded);
        assert_eq!(ended.position, Some(GeoPoint::ORIGIN));

        assert!(tracker.list_active_buses().is_empty());
        assert!(tracker.active_statuses().is_empty());
        for stop in [1, 5, 2] {
            let arrivals = tracker.find_arrivals(&stop.to_string()).unwrap();
            assert!(arrivals.arrivals.is_empty());
        }
    }

    #[test]
    fn test_bus_at_stop_scenario() {
        let tracker = two_stop_tracker();
        tracker
            .ingest_position(BUS_1, DRIVER_1, GeoPoint::new(17.6778, 75.9140), Some("running"))
            .unwrap();

        let arrivals = tracker.find_arrivals("1").unwrap();
        assert_eq!(arrivals.stop.id, StopIdentifier::new(1));
        assert_eq!(arrivals.arrivals.len(), 1);
        assert_eq!(arrivals.arrivals[0].bus_id, BUS_1);
        assert_eq!(arrivals.arrivals[0].distance_meters, 0);
        assert_eq!(arrivals.arrivals[0].eta_minutes, Some(0));

        tracker
            .ingest_position(BUS_1, DRIVER_1, GeoPoint::new(17.6778, 75.9140), Some("trip_ended"))
            .unwrap();
        assert!(tracker.find_arrivals("1").unwrap().arrivals.is_empty());
    }

    #[test]
    fn test_find_arrivals_by_name_and_unknown_stop() {
        let tracker = tracker();

        assert_eq!(
            tracker.find_arrivals("  BUS STAND ").unwrap().stop.id,
            StopIdentifier::new(5)
        );

        let err = tracker.find_arrivals("airport").unwrap_err();
        assert!(matches!(err, TransitError::StopNotFound(ref q) if q == "airport"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_arrivals_sorted_by_eta() {
        let tracker = tracker();
        // Bus 2 at the stop, bus 1 across town; both on R1
        tracker
            .ingest_position(BUS_1, DRIVER_1, GeoPoint::new(17.6826418, 75.9268586), None)
            .unwrap();
        tracker
            .ingest_position(
                BusIdentifier::new(2),
                DriverIdentifier::new(2),
                GeoPoint::new(17.679605, 75.898729),
                None,
            )
            .unwrap();

        let mut arrivals = tracker.find_arrivals("5").unwrap().arrivals;
        sort_by_eta(&mut arrivals, |a| a.eta_minutes);

        let order: Vec<u32> = arrivals.iter().map(|a| a.bus_id.get()).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn test_journey_directionality() {
        let tracker = tracker();
        tracker
            .ingest_position(BUS_1, DRIVER_1, GeoPoint::new(17.6778, 75.9140), None)
            .unwrap();

        let forward = tracker.find_journey_options("kanna chowk", "market yard").unwrap();
        assert_eq!(forward.source.id, StopIdentifier::new(1));
        assert_eq!(forward.destination.id, StopIdentifier::new(2));
        assert_eq!(forward.options.len(), 1);
        assert_eq!(forward.options[0].route_id, RouteIdentifier::new(1));

        let reverse = tracker.find_journey_options("2", "1").unwrap();
        assert!(reverse.options.is_empty());
    }

    #[test]
    fn test_journey_invalid_endpoints() {
        let tracker = tracker();

        let err = tracker.find_journey_options("1", "nowhere").unwrap_err();
        assert!(matches!(err, TransitError::InvalidJourneyEndpoints { .. }));
        assert!(tracker.find_journey_options("", "2").is_err());
    }

    #[test]
    fn test_list_active_buses_enrichment() {
        let tracker = tracker();
        // Just past Bus Stand on R1
        tracker
            .ingest_position(BUS_1, DRIVER_1, GeoPoint::new(17.6797, 75.8990), Some("delay"))
            .unwrap();

        let active = tracker.list_active_buses();
        assert_eq!(active.len(), 1);

        let bus = &active[0];
        assert_eq!(bus.status.bus_id, BUS_1);
        assert_eq!(bus.registration_number.as_deref(), Some("MH-12-AB-1110"));
        assert_eq!(bus.route_number.as_deref(), Some("R1"));

        let nearest = bus.nearest_stop.as_ref().unwrap();
        assert_eq!(nearest.stop_id, StopIdentifier::new(5));
        assert_eq!(nearest.index, 1);
        assert!(nearest.distance_meters < 50);
    }

    #[test]
    fn test_degenerate_speed_config() {
        let tracker = two_stop_tracker().with_config(TrackerConfig {
            average_speed_kmph: 0.0,
        });
        tracker
            .ingest_position(BUS_1, DRIVER_1, GeoPoint::new(17.6826, 75.9269), None)
            .unwrap();

        let arrivals = tracker.find_arrivals("1").unwrap().arrivals;
        assert_eq!(arrivals.len(), 1);
        assert_eq!(arrivals[0].eta_minutes, None);
    }

    #[test]
    fn test_nearest_stops_validates_position() {
        let tracker = tracker();

        assert_eq!(
            tracker.nearest_stops(GeoPoint::new(17.6812, 75.9027), 1).unwrap()[0].id,
            StopIdentifier::new(3)
        );
        assert!(tracker.nearest_stops(GeoPoint::new(100.0, 0.0), 1).is_err());
    }

    #[test]
    fn test_schedule_passthrough() {
        let tracker = tracker();
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let assignment = RouteAssignment {
            route_id: RouteIdentifier::new(2),
            bus_id: BusIdentifier::new(3),
            driver_id: DriverIdentifier::new(3),
            start_time: chrono::NaiveTime::from_hms_opt(6, 30, 0).unwrap(),
            end_time: chrono::NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            is_active: true,
        };

        tracker.replace_schedule(date, vec![assignment.clone()]).unwrap();

        assert_eq!(tracker.schedule_for(date).routes, vec![assignment.clone()]);
        assert_eq!(
            tracker.assignment_for_driver(date, DriverIdentifier::new(3)),
            Some(assignment)
        );
    }
}
