//! Vehicle records and the mutable fleet registry.

use std::collections::BTreeSet;
use std::fmt;

use bevy_ecs::prelude::Resource;
use serde::Serialize;

use crate::booking::{BookingId, VehicleClass};
use crate::geo::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VehicleId(pub u64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One vehicle for the day. Plan and totals are rebuilt wholesale whenever
/// the plan changes; the route holds the (pickup, drop) pair of every plan
/// entry in plan order.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    pub class: VehicleClass,
    pub home: GeoPoint,
    /// Assigned booking ids, sorted by pickup time then id.
    pub plan: Vec<BookingId>,
    pub route: Vec<GeoPoint>,
    pub active_km: f64,
    pub dead_km: f64,
    pub driver_pay: f64,
    /// Earliest minute this vehicle can start new work.
    pub available_from: u32,
}

impl Vehicle {
    pub fn new(id: VehicleId, class: VehicleClass, home: GeoPoint, available_from: u32) -> Self {
        Self {
            id,
            class,
            home,
            plan: Vec::new(),
            route: Vec::new(),
            active_km: 0.0,
            dead_km: 0.0,
            driver_pay: 0.0,
            available_from,
        }
    }

    /// Last drop of the current route, if any.
    pub fn last_drop(&self) -> Option<GeoPoint> {
        self.route.last().copied()
    }

    /// Where the vehicle ends its committed work: the last drop, or home.
    pub fn position(&self) -> GeoPoint {
        self.last_drop().unwrap_or(self.home)
    }
}

/// The only mutable engine state: every vehicle for the day. Cloned wholesale
/// when a reassignment run needs a shadow copy to speculate on.
#[derive(Debug, Default, Clone, Resource)]
pub struct FleetRegistry {
    vehicles: Vec<Vehicle>,
}

impl FleetRegistry {
    pub fn from_vehicles(vehicles: Vec<Vehicle>) -> Self {
        Self { vehicles }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Vehicle> {
        self.vehicles.iter_mut()
    }

    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn get_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.iter_mut().find(|v| v.id == id)
    }

    /// Every booking id currently held by some plan.
    pub fn assigned_ids(&self) -> BTreeSet<BookingId> {
        self.vehicles
            .iter()
            .flat_map(|v| v.plan.iter().copied())
            .collect()
    }

    /// The vehicle holding `id`, if any.
    pub fn holder_of(&self, id: BookingId) -> Option<VehicleId> {
        self.vehicles
            .iter()
            .find(|v| v.plan.contains(&id))
            .map(|v| v.id)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}
