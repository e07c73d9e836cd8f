//! Live bus state fed by driver reports.

pub mod table;

pub use table::{LiveStateTable, LiveStatus};
