//! Fleet data models, types, and traits.

pub mod entities;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use entities::{normalize_stop_name, Bus, Driver, Route, Stop};
pub use traits::TopologyProvider;
pub use types::{BusStatus, ErrorKind, GeoPoint, IssueCode, Result, TransitError};
