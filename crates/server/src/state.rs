use std::sync::Arc;

use bus_tracker_transit::{
    BusIdentifier, BusTracker, DriverIdentifier, TopologyProvider, TransitError,
};

#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<BusTracker>,
}

impl AppState {
    pub fn new(tracker: BusTracker) -> Self {
        Self {
            tracker: Arc::new(tracker),
        }
    }

    pub fn topology(&self) -> &dyn TopologyProvider {
        self.tracker.topology()
    }

    /// The bus a driver reports for.
    pub fn bus_for_driver(
        &self,
        driver_id: DriverIdentifier,
    ) -> Result<BusIdentifier, TransitError> {
        self.topology()
            .find_driver_by_id(driver_id)
            .map(|driver| driver.bus_id)
            .ok_or(TransitError::DriverNotFound(driver_id))
    }
}
