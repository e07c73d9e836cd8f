//! Latest reported state per bus.
//!
//! Entries live in a [`DashMap`], so every write happens under the lock of
//! the shard owning that bus id. A reader therefore sees either the whole old
//! entry or the whole new one, and buses in other shards are never blocked.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::identifiers::*;
use crate::models::types::{BusStatus, GeoPoint, IssueCode};

/// Most recent report for one bus.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct LiveStatus {
    pub bus_id: BusIdentifier,
    pub driver_id: DriverIdentifier,
    /// Route the bus was assigned to when the report arrived
    pub route_id: RouteIdentifier,
    /// `None` until the first report that carried coordinates
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub position: Option<GeoPoint>,
    pub status: BusStatus,
    pub issue: Option<IssueCode>,
    pub last_updated: DateTime<Utc>,
}

impl LiveStatus {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Process-lifetime table of [`LiveStatus`] keyed by bus.
///
/// Updates merge into the existing entry: fields an update does not carry are
/// kept, and `last_updated` is always refreshed. Entries are never removed.
#[derive(Debug, Default)]
pub struct LiveStateTable {
    entries: DashMap<BusIdentifier, LiveStatus>,
}

impl LiveStateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a position report.
    pub fn record_position(
        &self,
        bus_id: BusIdentifier,
        driver_id: DriverIdentifier,
        route_id: RouteIdentifier,
        position: GeoPoint,
        status: BusStatus,
    ) -> LiveStatus {
        self.upsert(bus_id, driver_id, route_id, |entry| {
            entry.position = Some(position);
            entry.status = status;
        })
    }

    /// Flag the bus as delayed with `issue`.
    ///
    /// The last known position is kept unless `position` is given, in which
    /// case it is replaced within the same update.
    pub fn record_emergency(
        &self,
        bus_id: BusIdentifier,
        driver_id: DriverIdentifier,
        route_id: RouteIdentifier,
        issue: IssueCode,
        position: Option<GeoPoint>,
    ) -> LiveStatus {
        self.upsert(bus_id, driver_id, route_id, |entry| {
            if let Some(position) = position {
                entry.position = Some(position);
            }
            entry.status = BusStatus::Delay;
            entry.issue = Some(issue);
        })
    }

    /// Mark the trip finished and park the position at (0, 0).
    pub fn end_trip(
        &self,
        bus_id: BusIdentifier,
        driver_id: DriverIdentifier,
        route_id: RouteIdentifier,
    ) -> LiveStatus {
        self.upsert(bus_id, driver_id, route_id, |entry| {
            entry.position = Some(GeoPoint::ORIGIN);
            entry.status = BusStatus::TripEnded;
        })
    }

    /// `None` if the bus has never reported.
    pub fn get_status(&self, bus_id: BusIdentifier) -> Option<LiveStatus> {
        self.entries.get(&bus_id).map(|entry| entry.value().clone())
    }

    /// Like [`get_status`](Self::get_status), but only for running or delayed buses.
    pub fn active_status(&self, bus_id: BusIdentifier) -> Option<LiveStatus> {
        self.entries
            .get(&bus_id)
            .filter(|entry| entry.is_active())
            .map(|entry| entry.value().clone())
    }

    /// All running or delayed entries, in no particular order.
    pub fn list_active(&self) -> Vec<LiveStatus> {
        self.entries
            .iter()
            .filter(|entry| entry.is_active())
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Every entry regardless of status, in no particular order.
    pub fn snapshot(&self) -> Vec<LiveStatus> {
        self.entries.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn upsert(
        &self,
        bus_id: BusIdentifier,
        driver_id: DriverIdentifier,
        route_id: RouteIdentifier,
        apply: impl FnOnce(&mut LiveStatus),
    ) -> LiveStatus {
        let now = Utc::now();
        let mut entry = self.entries.entry(bus_id).or_insert_with(|| LiveStatus {
            bus_id,
            driver_id,
            route_id,
            position: None,
            status: BusStatus::default(),
            issue: None,
            last_updated: now,
        });

        let status = entry.value_mut();
        status.driver_id = driver_id;
        status.route_id = route_id;
        apply(status);
        status.last_updated = now;
        status.clone()
    }
}
