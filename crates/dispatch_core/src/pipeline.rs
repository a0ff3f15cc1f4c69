//! The reassignment pipeline: shed unlocked work, run the exact / upgrade /
//! urgent passes over the pool, close every non-empty route with its
//! home-return leg. Also the end-of-day sweep.
//!
//! A run mutates a shadow copy of the registry and swaps it in whole, so a
//! half-finished run can never leak into the live fleet.

use std::collections::BTreeSet;

use crate::assign::{commit_assignment, run_pass, run_urgent_pass, sort_ascending, ClassRule};
use crate::booking::{BookingBoard, BookingId};
use crate::fleet::{FleetRegistry, VehicleId};
use crate::pricing::PricingTable;
use crate::routecost::{apply_home_leg, rebuild_vehicle};
use crate::scenario::DispatchParams;

/// What one pipeline run did.
#[derive(Debug, Default)]
pub struct PipelineOutcome {
    /// Unlocked ids shed from plans at the start of the run.
    pub dropped: Vec<BookingId>,
    /// Ids that stayed unassigned after all three passes.
    pub unassigned: Vec<BookingId>,
}

/// Drop every unlocked booking from every plan and rebuild the rolling state
/// from the locked remainder. Availability is re-derived from the kept plan
/// with `now` as the floor, exactly what the gate computed for it: a shed
/// booking cannot hand minutes back to the vehicle, and rerunning the
/// pipeline at the same tick sees the same starting state.
pub fn release_unlocked(
    fleet: &mut FleetRegistry,
    locked: &BTreeSet<BookingId>,
    board: &BookingBoard,
    pricing: &PricingTable,
    params: &DispatchParams,
    now: u32,
) -> Vec<BookingId> {
    let mut dropped = Vec::new();
    for vehicle in fleet.iter_mut() {
        let (keep, shed): (Vec<BookingId>, Vec<BookingId>) = vehicle
            .plan
            .iter()
            .copied()
            .partition(|id| locked.contains(id));
        vehicle.plan = keep;
        dropped.extend(shed);
        rebuild_vehicle(vehicle, board, pricing);
        let kept_completion = vehicle
            .plan
            .iter()
            .filter_map(|id| board.get(*id))
            .map(|b| b.completion_min(params.service_time_min))
            .max()
            .unwrap_or(0);
        vehicle.available_from = now.max(kept_completion);
    }
    dropped
}

/// Run the full pipeline at `now`. The pool is every visible booking not held
/// by a locked plan entry: freshly loaded ones, never-assigned ones, and the
/// unlocked ones shed at the start of this run.
pub fn run_reassignment(
    fleet: &mut FleetRegistry,
    locked: &BTreeSet<BookingId>,
    board: &BookingBoard,
    pricing: &PricingTable,
    params: &DispatchParams,
    now: u32,
) -> PipelineOutcome {
    let mut shadow = fleet.clone();
    let dropped = release_unlocked(&mut shadow, locked, board, pricing, params, now);

    let mut taken = shadow.assigned_ids();
    let mut pool: Vec<BookingId> = board
        .iter()
        .map(|b| b.id)
        .filter(|id| !taken.contains(id))
        .collect();
    sort_ascending(&mut pool, board);

    let exact = run_pass(
        &mut shadow,
        &pool,
        ClassRule::Exact,
        &mut taken,
        board,
        pricing,
        params,
    );
    let upgrade = run_pass(
        &mut shadow,
        &exact.leftover,
        ClassRule::UpgradeOne,
        &mut taken,
        board,
        pricing,
        params,
    );
    let urgent = run_urgent_pass(
        &mut shadow,
        &upgrade.leftover,
        now,
        &mut taken,
        board,
        pricing,
        params,
    );

    for vehicle in shadow.iter_mut() {
        if !vehicle.plan.is_empty() {
            apply_home_leg(vehicle, pricing);
        }
    }

    *fleet = shadow;
    PipelineOutcome {
        dropped,
        unassigned: urgent.leftover,
    }
}

/// Best-effort end-of-day sweep: place every still-unassigned booking on the
/// least-loaded compatible vehicle, no availability test, soft plan cap.
/// Every route is then rebuilt and closed again so the home leg is booked
/// exactly once.
pub fn final_sweep(
    fleet: &mut FleetRegistry,
    board: &BookingBoard,
    pricing: &PricingTable,
    params: &DispatchParams,
) -> Vec<BookingId> {
    for vehicle in fleet.iter_mut() {
        rebuild_vehicle(vehicle, board, pricing);
    }

    let assigned = fleet.assigned_ids();
    let mut pool: Vec<BookingId> = board
        .iter()
        .map(|b| b.id)
        .filter(|id| !assigned.contains(id))
        .collect();
    sort_ascending(&mut pool, board);

    let mut placed = Vec::new();
    for id in pool {
        let Some(booking) = board.get(id) else {
            continue;
        };
        let mut best: Option<(usize, VehicleId)> = None;
        for vehicle in fleet.iter() {
            if vehicle.class.0 < booking.class.0 {
                continue;
            }
            if vehicle.plan.len() >= params.overload_cap_final {
                continue;
            }
            let candidate = (vehicle.plan.len(), vehicle.id);
            if best.map_or(true, |current| candidate < current) {
                best = Some(candidate);
            }
        }
        if let Some((_, vehicle_id)) = best {
            let vehicle = fleet.get_mut(vehicle_id).expect("chosen vehicle exists");
            commit_assignment(vehicle, booking, board, pricing, params);
            placed.push(id);
        }
    }

    for vehicle in fleet.iter_mut() {
        if !vehicle.plan.is_empty() {
            apply_home_leg(vehicle, pricing);
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{Booking, BookingOrigin, VehicleClass};
    use crate::fleet::Vehicle;
    use crate::geo::GeoPoint;

    fn booking(id: u64, class: u8, lng: f64, pickup_min: u32) -> Booking {
        Booking {
            id: BookingId(id),
            class: VehicleClass(class),
            pickup: GeoPoint::new(0.0, lng),
            drop: GeoPoint::new(0.0, lng + 0.05),
            pickup_min,
            distance_km: 7.0,
            travel_min: 30,
            origin: BookingOrigin::Scheduled,
        }
    }

    #[test]
    fn release_keeps_locked_and_availability() {
        let mut board = BookingBoard::default();
        board.insert(booking(1, 1, 0.1, 480));
        board.insert(booking(2, 1, 0.2, 900));
        let pricing = PricingTable::default();

        let mut vehicle =
            Vehicle::new(VehicleId(1), VehicleClass(1), GeoPoint::new(0.0, 0.0), 360);
        vehicle.plan = vec![BookingId(1), BookingId(2)];
        rebuild_vehicle(&mut vehicle, &board, &pricing);
        let mut fleet = FleetRegistry::from_vehicles(vec![vehicle]);
        let params = DispatchParams::default();

        let locked = BTreeSet::from([BookingId(1)]);
        let dropped = release_unlocked(&mut fleet, &locked, &board, &pricing, &params, 420);

        assert_eq!(dropped, vec![BookingId(2)]);
        let vehicle = fleet.get(VehicleId(1)).expect("vehicle");
        assert_eq!(vehicle.plan, vec![BookingId(1)]);
        assert_eq!(vehicle.route.len(), 2);
        // Availability sits at the locked booking's completion (480 + 30 +
        // 30); shedding the later booking earns nothing back.
        assert_eq!(vehicle.available_from, 540);
    }

    #[test]
    fn sweep_places_on_least_loaded_compatible() {
        let mut board = BookingBoard::default();
        board.insert(booking(1, 1, 0.1, 480));
        let pricing = PricingTable::default();
        let params = DispatchParams::default();

        let home = GeoPoint::new(0.0, 0.0);
        let mut loaded = Vehicle::new(VehicleId(1), VehicleClass(2), home, 360);
        loaded.plan = vec![];
        let light = Vehicle::new(VehicleId(2), VehicleClass(1), home, 2000);
        let mut fleet = FleetRegistry::from_vehicles(vec![loaded, light]);

        let placed = final_sweep(&mut fleet, &board, &pricing, &params);
        assert_eq!(placed, vec![BookingId(1)]);
        // Both vehicles are empty and compatible; the lower id wins, and the
        // availability of the other (busy past day end) never mattered.
        assert_eq!(fleet.holder_of(BookingId(1)), Some(VehicleId(1)));
        let vehicle = fleet.get(VehicleId(1)).expect("vehicle");
        assert!(vehicle.dead_km > 0.0, "home leg was booked");
    }

    #[test]
    fn sweep_respects_the_soft_cap() {
        let mut board = BookingBoard::default();
        for id in 1..=11 {
            board.insert(booking(id, 1, 0.1 + id as f64 * 0.01, 400 + id as u32 * 10));
        }
        let pricing = PricingTable::default();
        let params = DispatchParams::default();
        let fleet_vehicle =
            Vehicle::new(VehicleId(1), VehicleClass(1), GeoPoint::new(0.0, 0.0), 360);
        let mut fleet = FleetRegistry::from_vehicles(vec![fleet_vehicle]);

        let placed = final_sweep(&mut fleet, &board, &pricing, &params);
        assert_eq!(placed.len(), params.overload_cap_final);
        let vehicle = fleet.get(VehicleId(1)).expect("vehicle");
        assert_eq!(vehicle.plan.len(), params.overload_cap_final);
    }
}
