//! R-tree nodes for spatial indexing of stops.
//!
//! ## Two-Stage Filtering
//!
//! Radius queries first filter in the R-tree on raw degrees, using a radius
//! widened to the degree span that `radius_m` can cover at the query
//! latitude, then apply exact Haversine distance to the survivors.

use std::sync::Arc;

use geo::Point;
use rstar::{PointDistance, RTreeObject, AABB};

use crate::models::entities::Stop;

#[derive(Clone)]
pub struct StopNode {
    pub stop: Arc<Stop>,
    point: [f64; 2],
}

impl StopNode {
    pub fn new(stop: Arc<Stop>) -> Self {
        let location: Point = stop.location().into();
        Self {
            point: [location.x(), location.y()],
            stop,
        }
    }
}

impl RTreeObject for StopNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StopNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Meters covered by one degree of latitude.
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Upper bound, in degrees, of the span `radius_m` can cover around `latitude`.
///
/// Longitude degrees shrink towards the poles, so the bound divides by the
/// cosine of the latitude (clamped to keep it finite near the poles).
pub fn search_radius_degrees(radius_m: f64, latitude: f64) -> f64 {
    let cos_lat = latitude.to_radians().cos().abs().max(0.01);
    radius_m / (METERS_PER_DEGREE * cos_lat) * 1.1
}
