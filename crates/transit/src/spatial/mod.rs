//! Spatial indexing, distance and ETA utilities.

pub mod index;
pub mod queries;

pub use queries::{
    estimate_eta_minutes, great_circle_distance_meters, haversine_distance, DistanceEstimator,
    StraightLine, DEFAULT_AVERAGE_SPEED_KMPH, EARTH_RADIUS_M,
};
