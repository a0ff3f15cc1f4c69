//! Greedy assignment: for each booking, pick the vehicle minimizing the
//! dead-minus-active km delta, then densify that vehicle's route from the
//! evening-first scan.
//!
//! All hypotheticals use the rolling dead-km form; the home leg is a
//! pipeline concern. Ordering is deterministic throughout: pools are
//! processed in ascending (pickup, id) order, vehicle ties break on fewer
//! booked trips, then lower vehicle id.

use std::collections::BTreeSet;

use crate::booking::{Booking, BookingBoard, BookingId, VehicleClass};
use crate::fleet::{FleetRegistry, Vehicle, VehicleId};
use crate::geo::{distance_km, travel_minutes};
use crate::pricing::PricingTable;
use crate::routecost::{rebuild_vehicle, rolling_dead_km};
use crate::scenario::DispatchParams;

/// Most bookings route completion may add after one fresh assignment.
const ROUTE_FILL_LIMIT: usize = 3;

/// Which vehicles a pass may consider for a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassRule {
    /// Vehicles of exactly the booking's class.
    Exact,
    /// Vehicles exactly one class above the booking's class.
    UpgradeOne,
    /// Any vehicle rated at or above the booking's class.
    AtLeast,
}

impl ClassRule {
    fn admits(self, vehicle: VehicleClass, booking: VehicleClass) -> bool {
        match self {
            ClassRule::Exact => vehicle == booking,
            ClassRule::UpgradeOne => vehicle.0 == booking.0 + 1,
            ClassRule::AtLeast => vehicle.0 >= booking.0,
        }
    }
}

/// Can `vehicle` reach the pickup from its last committed drop in time?
pub fn accepts(vehicle: &Vehicle, booking: &Booking, params: &DispatchParams) -> bool {
    let deadhead = distance_km(vehicle.position(), booking.pickup);
    let arrival =
        vehicle.available_from as f64 + travel_minutes(deadhead, params.deadhead_speed_kmh);
    arrival <= booking.pickup_min as f64
}

/// Hypothetical dead-minus-active delta of appending `booking` to `vehicle`.
pub fn assignment_delta(vehicle: &Vehicle, booking: &Booking) -> f64 {
    let mut route = vehicle.route.clone();
    route.push(booking.pickup);
    route.push(booking.drop);
    let dead = rolling_dead_km(&route, vehicle.home);
    let active = vehicle.active_km + booking.distance_km;
    dead - active
}

/// Pick the vehicle minimizing [assignment_delta] among those the rule
/// admits. `require_availability` is waived only by the urgency pass, which
/// also supplies a plan-size `cap`.
fn choose_vehicle(
    fleet: &FleetRegistry,
    booking: &Booking,
    rule: ClassRule,
    require_availability: bool,
    cap: Option<usize>,
    params: &DispatchParams,
) -> Option<VehicleId> {
    if rule == ClassRule::UpgradeOne && booking.class.0 >= params.class_upgrade_max {
        return None;
    }

    let mut best: Option<(f64, usize, VehicleId)> = None;
    for vehicle in fleet.iter() {
        if !rule.admits(vehicle.class, booking.class) {
            continue;
        }
        if let Some(cap) = cap {
            if vehicle.plan.len() >= cap {
                continue;
            }
        }
        if require_availability && !accepts(vehicle, booking, params) {
            continue;
        }

        let delta = assignment_delta(vehicle, booking);
        let candidate = (delta, vehicle.plan.len(), vehicle.id);
        let better = match &best {
            None => true,
            Some(current) => {
                candidate.0 < current.0
                    || (candidate.0 == current.0
                        && (candidate.1, candidate.2) < (current.1, current.2))
            }
        };
        if better {
            best = Some(candidate);
        }
    }
    best.map(|(_, _, id)| id)
}

/// Put `booking` on `vehicle`: extend the plan, rebuild the rolling totals,
/// and advance availability to the booking's completion. Availability never
/// moves backwards.
pub fn commit_assignment(
    vehicle: &mut Vehicle,
    booking: &Booking,
    board: &BookingBoard,
    pricing: &PricingTable,
    params: &DispatchParams,
) {
    vehicle.plan.push(booking.id);
    rebuild_vehicle(vehicle, board, pricing);
    let done = booking.completion_min(params.service_time_min);
    vehicle.available_from = vehicle.available_from.max(done);
}

/// Sort booking ids ascending by (pickup time, id).
pub fn sort_ascending(pool: &mut [BookingId], board: &BookingBoard) {
    pool.sort_by_key(|id| {
        let pickup = board.get(*id).map(|b| b.pickup_min).unwrap_or(u32::MAX);
        (pickup, id.0)
    });
}

/// After a fresh assignment, scan the evening-first list for still-unassigned
/// bookings that fit this vehicle and add the cheapest one per round, up to
/// [ROUTE_FILL_LIMIT]. Completion candidates may sit one class below the
/// vehicle.
fn complete_route(
    fleet: &mut FleetRegistry,
    vehicle_id: VehicleId,
    descending: &[BookingId],
    taken: &mut BTreeSet<BookingId>,
    board: &BookingBoard,
    pricing: &PricingTable,
    params: &DispatchParams,
) -> Vec<BookingId> {
    let mut added = Vec::new();
    for _ in 0..ROUTE_FILL_LIMIT {
        let Some(vehicle) = fleet.get(vehicle_id) else {
            break;
        };

        let mut best: Option<(f64, BookingId)> = None;
        for id in descending {
            if taken.contains(id) {
                continue;
            }
            let Some(candidate) = board.get(*id) else {
                continue;
            };
            let fits_class = vehicle.class == candidate.class
                || vehicle.class.0 == candidate.class.0 + 1;
            if !fits_class || !accepts(vehicle, candidate, params) {
                continue;
            }

            let delta = assignment_delta(vehicle, candidate);
            let better = match &best {
                None => true,
                Some((current, current_id)) => {
                    delta < *current || (delta == *current && id.0 < current_id.0)
                }
            };
            if better {
                best = Some((delta, *id));
            }
        }

        let Some((_, chosen)) = best else {
            break;
        };
        let booking = board.get(chosen).expect("candidate came from the board");
        let vehicle = fleet.get_mut(vehicle_id).expect("vehicle exists");
        commit_assignment(vehicle, booking, board, pricing, params);
        taken.insert(chosen);
        added.push(chosen);
    }
    added
}

/// Outcome of one pass over a pool.
#[derive(Debug, Default)]
pub struct PassOutcome {
    pub assigned: Vec<BookingId>,
    pub leftover: Vec<BookingId>,
}

/// One greedy pass: walk `pool` in ascending pickup order, place each booking
/// on its best vehicle, and run route completion after every placement.
/// `taken` carries every id already held by a plan this run.
pub fn run_pass(
    fleet: &mut FleetRegistry,
    pool: &[BookingId],
    rule: ClassRule,
    taken: &mut BTreeSet<BookingId>,
    board: &BookingBoard,
    pricing: &PricingTable,
    params: &DispatchParams,
) -> PassOutcome {
    let mut ascending = pool.to_vec();
    sort_ascending(&mut ascending, board);
    let descending: Vec<BookingId> = ascending.iter().rev().copied().collect();

    let mut outcome = PassOutcome::default();
    for id in &ascending {
        if taken.contains(id) {
            continue;
        }
        let Some(booking) = board.get(*id) else {
            continue;
        };

        let chosen = choose_vehicle(fleet, booking, rule, true, None, params);
        let Some(vehicle_id) = chosen else {
            outcome.leftover.push(*id);
            continue;
        };

        let vehicle = fleet.get_mut(vehicle_id).expect("chosen vehicle exists");
        commit_assignment(vehicle, booking, board, pricing, params);
        taken.insert(*id);
        outcome.assigned.push(*id);

        let filled = complete_route(fleet, vehicle_id, &descending, taken, board, pricing, params);
        outcome.assigned.extend(filled);
    }
    outcome
}

/// The urgency pass: bookings with pickup inside the urgent window get placed
/// without the availability test, bounded only by class compatibility and the
/// plan-size cap. Selection still minimizes the delta.
pub fn run_urgent_pass(
    fleet: &mut FleetRegistry,
    pool: &[BookingId],
    now: u32,
    taken: &mut BTreeSet<BookingId>,
    board: &BookingBoard,
    pricing: &PricingTable,
    params: &DispatchParams,
) -> PassOutcome {
    let mut ascending = pool.to_vec();
    sort_ascending(&mut ascending, board);

    let mut outcome = PassOutcome::default();
    for id in &ascending {
        if taken.contains(id) {
            continue;
        }
        let Some(booking) = board.get(*id) else {
            continue;
        };
        if booking.pickup_min > now + params.urgent_window_min {
            outcome.leftover.push(*id);
            continue;
        }

        let chosen = choose_vehicle(
            fleet,
            booking,
            ClassRule::AtLeast,
            false,
            Some(params.overload_cap),
            params,
        );
        match chosen {
            Some(vehicle_id) => {
                let vehicle = fleet.get_mut(vehicle_id).expect("chosen vehicle exists");
                commit_assignment(vehicle, booking, board, pricing, params);
                taken.insert(*id);
                outcome.assigned.push(*id);
            }
            None => outcome.leftover.push(*id),
        }
    }
    outcome
}
