//! Request bodies and query strings.

use bus_tracker_transit::{GeoPoint, RouteAssignment};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// `POST /driver/{driverId}/live`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LivePositionRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// Free-form; unknown values are recorded as `running`
    #[serde(default)]
    pub status: Option<String>,
}

impl LivePositionRequest {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// `POST /driver/{driverId}/emergency`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmergencyRequest {
    pub issue: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl EmergencyRequest {
    /// Coordinates count only when both are present.
    pub fn position(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.latitude?, self.longitude?))
    }
}

/// `GET /user/arrivals?stop=`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrivalsQuery {
    #[serde(default)]
    pub stop: Option<String>,
}

/// `GET /user/journey?source=&destination=`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JourneyQuery {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
}

/// `GET /user/stops/nearest?lat=&lon=&limit=`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NearestStopsQuery {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl NearestStopsQuery {
    pub const DEFAULT_LIMIT: usize = 3;
    pub const MAX_LIMIT: usize = 50;

    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .min(Self::MAX_LIMIT)
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// `GET /driver/{driverId}/assignment?date=`; no date means tomorrow.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentQuery {
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// `POST /admin/tomorrow-schedule`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleUpdateRequest {
    pub routes: Vec<RouteAssignment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bus_tracker_transit::{BusIdentifier, RouteIdentifier};

    #[test]
    fn test_live_position_status_is_optional() {
        let req: LivePositionRequest =
            serde_json::from_str(r#"{"latitude": 17.6778, "longitude": 75.914}"#).unwrap();

        assert_eq!(req.status, None);
        assert_eq!(req.position(), GeoPoint::new(17.6778, 75.914));
    }

    #[test]
    fn test_live_position_rejects_string_coordinates() {
        let res = serde_json::from_str::<LivePositionRequest>(
            r#"{"latitude": "17.6", "longitude": 75.9, "status": "running"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_emergency_needs_both_coordinates() {
        let only_lat: EmergencyRequest =
            serde_json::from_str(r#"{"issue": "bus_problem", "latitude": 17.6}"#).unwrap();
        assert_eq!(only_lat.position(), None);

        let both: EmergencyRequest = serde_json::from_str(
            r#"{"issue": "bus_problem", "latitude": 17.6, "longitude": 75.9}"#,
        )
        .unwrap();
        assert_eq!(both.position(), Some(GeoPoint::new(17.6, 75.9)));
    }

    #[test]
    fn test_nearest_limit_is_capped() {
        let q = NearestStopsQuery {
            lat: 0.0,
            lon: 0.0,
            limit: Some(10_000),
        };
        assert_eq!(q.limit(), NearestStopsQuery::MAX_LIMIT);

        let q = NearestStopsQuery { limit: None, ..q };
        assert_eq!(q.limit(), NearestStopsQuery::DEFAULT_LIMIT);
    }

    #[test]
    fn test_schedule_update_wire_format() {
        let req: ScheduleUpdateRequest = serde_json::from_str(
            r#"{"routes": [{"routeId": 2, "busId": 3, "driverId": 3, "startTime": "06:30", "endTime": "14:00"}]}"#,
        )
        .unwrap();

        let a = &req.routes[0];
        assert_eq!(a.route_id, RouteIdentifier::new(2));
        assert_eq!(a.bus_id, BusIdentifier::new(3));
        assert_eq!(a.start_time.format("%H:%M").to_string(), "06:30");
        assert!(a.is_active);
    }
}
