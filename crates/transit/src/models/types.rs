//! Core data types and enums for fleet tracking.

use std::fmt;
use std::str::FromStr;

use crate::identifiers::*;

// ============================================================================
// Geometry
// ============================================================================

/// A WGS84 position in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Position written by `end_trip` so a finished bus drops off live maps.
    pub const ORIGIN: GeoPoint = GeoPoint {
        latitude: 0.0,
        longitude: 0.0,
    };

    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Checks the coordinates are finite and within the WGS84 ranges.
    pub fn validated(self) -> Result<Self> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);

        if lat_ok && lon_ok {
            Ok(self)
        } else {
            Err(TransitError::InvalidCoordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

impl From<GeoPoint> for geo::Point {
    fn from(p: GeoPoint) -> Self {
        geo::Point::new(p.longitude, p.latitude)
    }
}

impl From<geo::Point> for GeoPoint {
    fn from(p: geo::Point) -> Self {
        GeoPoint::new(p.y(), p.x())
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Reported operating state of a bus.
///
/// Drivers send free-form strings. `parse_or_default` folds anything outside
/// the known set into `Running`: an unrecognised value is ingested as a moving
/// bus rather than rejected, and the table never holds a state it cannot name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum BusStatus {
    #[default]
    Running,
    #[cfg_attr(feature = "serde", serde(alias = "delayed"))]
    Delay,
    TripEnded,
    Inactive,
}

impl BusStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "running" => Some(Self::Running),
            "delay" | "delayed" => Some(Self::Delay),
            "trip_ended" => Some(Self::TripEnded),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }

    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }

    /// Running and delayed buses are shown to riders; the rest are not.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Delay)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Delay => "delay",
            Self::TripEnded => "trip_ended",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for BusStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason attached to an emergency signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum IssueCode {
    BusProblem,
    DriverHealthIssue,
    OtherIssue,
}

impl IssueCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BusProblem => "bus_problem",
            Self::DriverHealthIssue => "driver_health_issue",
            Self::OtherIssue => "other_issue",
        }
    }
}

impl FromStr for IssueCode {
    type Err = TransitError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bus_problem" => Ok(Self::BusProblem),
            "driver_health_issue" => Ok(Self::DriverHealthIssue),
            "other_issue" => Ok(Self::OtherIssue),
            other => Err(TransitError::InvalidIssueCode(other.to_owned())),
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Coarse classification of a [`TransitError`] for the request layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Degenerate,
}

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("stop not found: {0}")]
    StopNotFound(String),

    #[error("route not found: {0}")]
    RouteNotFound(RouteIdentifier),

    #[error("bus not found: {0}")]
    BusNotFound(BusIdentifier),

    #[error("driver not found: {0}")]
    DriverNotFound(DriverIdentifier),

    #[error("invalid source or destination: {source_query:?} -> {destination_query:?}")]
    InvalidJourneyEndpoints {
        source_query: String,
        destination_query: String,
    },

    #[error("invalid coordinates: ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("invalid issue code: {0}")]
    InvalidIssueCode(String),

    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("ETA undefined for average speed {0} km/h")]
    DegenerateSpeed(f64),
}

impl TransitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StopNotFound(_)
            | Self::RouteNotFound(_)
            | Self::BusNotFound(_)
            | Self::DriverNotFound(_)
            | Self::InvalidJourneyEndpoints { .. } => ErrorKind::NotFound,
            Self::InvalidCoordinates { .. }
            | Self::InvalidIssueCode(_)
            | Self::InvalidSchedule(_)
            | Self::InvalidData(_) => ErrorKind::InvalidInput,
            Self::DegenerateSpeed(_) => ErrorKind::Degenerate,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransitError>;
