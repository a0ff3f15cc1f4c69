//! Telemetry: per-tick snapshots of assignments and the day's totals.

use bevy_ecs::prelude::Resource;
use serde::Serialize;

use crate::booking::{BookingBoard, BookingId, VehicleClass};
use crate::fleet::{FleetRegistry, VehicleId};
use crate::locking::LockBoard;
use crate::pricing::PricingTable;
use crate::routecost::{efficiency, vehicle_fare};

/// Fleet-wide totals at one point in time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FleetTotals {
    pub active_km: f64,
    pub dead_km: f64,
    pub driver_pay: f64,
    pub customer_fare: f64,
    pub profit: f64,
    /// Active share of all kilometres, 0..=1.
    pub efficiency: f64,
    pub assigned: usize,
    pub unassigned: usize,
}

/// Sum every vehicle; unassigned counts the visible bookings no plan holds.
pub fn aggregate(
    fleet: &FleetRegistry,
    board: &BookingBoard,
    pricing: &PricingTable,
) -> FleetTotals {
    let mut totals = FleetTotals::default();
    for vehicle in fleet.iter() {
        totals.active_km += vehicle.active_km;
        totals.dead_km += vehicle.dead_km;
        totals.driver_pay += vehicle.driver_pay;
        totals.customer_fare += vehicle_fare(vehicle, board, pricing);
        totals.assigned += vehicle.plan.len();
    }
    totals.profit = totals.customer_fare - totals.driver_pay;
    totals.efficiency = efficiency(totals.active_km, totals.dead_km);
    totals.unassigned = board.len().saturating_sub(totals.assigned);
    totals
}

#[derive(Debug, Clone, Serialize)]
pub struct VehicleSnapshot {
    pub id: VehicleId,
    pub class: VehicleClass,
    pub plan: Vec<BookingId>,
    pub active_km: f64,
    pub dead_km: f64,
    pub driver_pay: f64,
    pub customer_fare: f64,
    pub available_from: u32,
}

/// One tick's assignment state.
#[derive(Debug, Clone, Serialize)]
pub struct TickSnapshot {
    /// Simulated minute this snapshot was taken at.
    pub at_min: u32,
    pub newly_loaded: Vec<BookingId>,
    pub locked: Vec<BookingId>,
    pub unassigned: Vec<BookingId>,
    pub vehicles: Vec<VehicleSnapshot>,
    pub totals: FleetTotals,
}

impl TickSnapshot {
    pub fn capture(
        at_min: u32,
        newly_loaded: Vec<BookingId>,
        fleet: &FleetRegistry,
        board: &BookingBoard,
        locks: &LockBoard,
        pricing: &PricingTable,
    ) -> Self {
        let assigned = fleet.assigned_ids();
        let mut unassigned: Vec<BookingId> = board
            .iter()
            .map(|b| b.id)
            .filter(|id| !assigned.contains(id))
            .collect();
        unassigned.sort();

        let vehicles = fleet
            .iter()
            .map(|v| VehicleSnapshot {
                id: v.id,
                class: v.class,
                plan: v.plan.clone(),
                active_km: v.active_km,
                dead_km: v.dead_km,
                driver_pay: v.driver_pay,
                customer_fare: vehicle_fare(v, board, pricing),
                available_from: v.available_from,
            })
            .collect();

        Self {
            at_min,
            newly_loaded,
            locked: locks.locked.iter().copied().collect(),
            unassigned,
            vehicles,
            totals: aggregate(fleet, board, pricing),
        }
    }
}

/// Collects the day's snapshots. Insert as a resource; the report renders it.
#[derive(Debug, Default, Resource, Serialize)]
pub struct DispatchTelemetry {
    pub ticks: Vec<TickSnapshot>,
}

impl DispatchTelemetry {
    pub fn record(&mut self, snapshot: TickSnapshot) {
        self.ticks.push(snapshot);
    }

    pub fn last(&self) -> Option<&TickSnapshot> {
        self.ticks.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{Booking, BookingOrigin};
    use crate::fleet::Vehicle;
    use crate::geo::GeoPoint;
    use crate::routecost::rebuild_vehicle;

    #[test]
    fn totals_tie_out() {
        let mut board = BookingBoard::default();
        board.insert(Booking {
            id: BookingId(1),
            class: VehicleClass(1),
            pickup: GeoPoint::new(0.0, 0.1),
            drop: GeoPoint::new(0.0, 0.2),
            pickup_min: 480,
            distance_km: 10.0,
            travel_min: 30,
            origin: BookingOrigin::Scheduled,
        });
        board.insert(Booking {
            id: BookingId(2),
            class: VehicleClass(1),
            pickup: GeoPoint::new(0.0, 0.3),
            drop: GeoPoint::new(0.0, 0.4),
            pickup_min: 600,
            distance_km: 5.0,
            travel_min: 30,
            origin: BookingOrigin::Instant,
        });
        let pricing = PricingTable::default();

        let mut vehicle =
            Vehicle::new(VehicleId(1), VehicleClass(1), GeoPoint::new(0.0, 0.0), 360);
        vehicle.plan = vec![BookingId(1)];
        rebuild_vehicle(&mut vehicle, &board, &pricing);
        let fleet = FleetRegistry::from_vehicles(vec![vehicle]);

        let totals = aggregate(&fleet, &board, &pricing);
        assert_eq!(totals.assigned, 1);
        assert_eq!(totals.unassigned, 1);
        assert!((totals.active_km - 10.0).abs() < 1e-9);
        assert!((totals.profit - (totals.customer_fare - totals.driver_pay)).abs() < 1e-9);
        assert!(totals.efficiency > 0.0 && totals.efficiency < 1.0);
    }
}
