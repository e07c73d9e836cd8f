//! Distance and ETA calculations.
//!
//! Straight-line (great-circle) distances only; there is no road network.

use crate::models::types::{GeoPoint, Result, TransitError};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Assumed average bus speed when none is configured.
pub const DEFAULT_AVERAGE_SPEED_KMPH: f64 = 20.0;

/// Haversine distance in meters between two coordinates in decimal degrees.
pub fn great_circle_distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1 for antipodal points
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(p1: GeoPoint, p2: GeoPoint) -> f64 {
    great_circle_distance_meters(p1.latitude, p1.longitude, p2.latitude, p2.longitude)
}

/// Minutes to cover `distance_m` at a constant `average_speed_kmph`, rounded
/// to the nearest whole minute.
///
/// Returns `Err(DegenerateSpeed)` for a zero, negative or non-finite speed;
/// the ETA is undefined there, not zero.
pub fn estimate_eta_minutes(distance_m: f64, average_speed_kmph: f64) -> Result<u32> {
    if !(average_speed_kmph.is_finite() && average_speed_kmph > 0.0) {
        return Err(TransitError::DegenerateSpeed(average_speed_kmph));
    }
    if !(distance_m.is_finite() && distance_m >= 0.0) {
        return Err(TransitError::InvalidData(format!(
            "distance must be a non-negative number of meters, got {distance_m}"
        )));
    }

    let meters_per_minute = average_speed_kmph * 1000.0 / 60.0;
    Ok((distance_m / meters_per_minute).round() as u32)
}

/// Strategy for measuring how far a bus is from a stop.
///
/// The tracker only ships [`StraightLine`]; a road-aware implementation can be
/// swapped in without touching the matchers.
pub trait DistanceEstimator: Send + Sync {
    fn distance_meters(&self, from: GeoPoint, to: GeoPoint) -> f64;
}

/// Great-circle distance.
#[derive(Clone, Copy, Debug, Default)]
pub struct StraightLine;

impl DistanceEstimator for StraightLine {
    fn distance_meters(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        haversine_distance(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const KANNA_CHOWK: GeoPoint = GeoPoint::new(17.6778, 75.9140);
    const MARKET_YARD: GeoPoint = GeoPoint::new(17.6826, 75.9269);

    #[test]
    fn test_haversine_distance() {
        // Distance from NYC to LA is approximately 3,936 km
        let nyc = GeoPoint::new(40.7128, -74.0060);
        let la = GeoPoint::new(34.0522, -118.2437);

        let dist = haversine_distance(nyc, la);
        assert!((dist - 3_936_000.0).abs() < 50_000.0); // Within 50km
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(haversine_distance(KANNA_CHOWK, KANNA_CHOWK), 0.0);
        assert_eq!(great_circle_distance_meters(-33.9, 151.2, -33.9, 151.2), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let there = haversine_distance(KANNA_CHOWK, MARKET_YARD);
        let back = haversine_distance(MARKET_YARD, KANNA_CHOWK);

        assert_relative_eq!(there, back, max_relative = 1e-12);
        // Roughly 1.47 km across town
        assert_abs_diff_eq!(there, 1_467.0, epsilon = 5.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = great_circle_distance_meters(0.0, 0.0, 1.0, 0.0);
        assert_relative_eq!(d, EARTH_RADIUS_M * 1f64.to_radians(), max_relative = 1e-9);
    }

    #[test]
    fn test_antipodal_points() {
        let d = great_circle_distance_meters(0.0, 0.0, 0.0, 180.0);
        assert_relative_eq!(d, EARTH_RADIUS_M * std::f64::consts::PI, max_relative = 1e-9);
    }

    #[test]
    fn test_eta_rounding() {
        // 20 km/h is 333.3 m/min
        assert_eq!(estimate_eta_minutes(0.0, 20.0).unwrap(), 0);
        assert_eq!(estimate_eta_minutes(166.0, 20.0).unwrap(), 0);
        assert_eq!(estimate_eta_minutes(167.0, 20.0).unwrap(), 1);
        assert_eq!(estimate_eta_minutes(1_000.0, 20.0).unwrap(), 3);
        assert_eq!(estimate_eta_minutes(10_000.0, 60.0).unwrap(), 10);
    }

    #[test]
    fn test_eta_zero_distance_any_speed() {
        for speed in [0.5, 20.0, 120.0] {
            assert_eq!(estimate_eta_minutes(0.0, speed).unwrap(), 0);
        }
    }

    #[test]
    fn test_eta_degenerate_speed() {
        for speed in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = estimate_eta_minutes(1_000.0, speed).unwrap_err();
            assert!(matches!(err, TransitError::DegenerateSpeed(_)));
        }
    }

    #[test]
    fn test_eta_rejects_negative_distance() {
        assert!(matches!(
            estimate_eta_minutes(-1.0, 20.0),
            Err(TransitError::InvalidData(_))
        ));
    }

    #[test]
    fn test_straight_line_estimator() {
        let est = StraightLine;
        assert_eq!(
            est.distance_meters(KANNA_CHOWK, MARKET_YARD),
            haversine_distance(KANNA_CHOWK, MARKET_YARD)
        );
    }
}
