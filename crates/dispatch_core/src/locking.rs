//! Locking gate: freeze near-term commitments and push vehicle availability
//! past them.
//!
//! Locking is time-based, never origin-based: an instant booking locks under
//! exactly the same rule as a scheduled one. The gate only computes the
//! locked set and availability; shedding unlocked work from plans is the
//! first phase of a reassignment run, so quiet ticks keep their assignments.

use std::collections::BTreeSet;

use bevy_ecs::prelude::Resource;

use crate::booking::{BookingBoard, BookingId};
use crate::fleet::FleetRegistry;
use crate::scenario::DispatchParams;

/// Booking ids whose assignments may no longer be disturbed. Recomputed every
/// tick; grows monotonically because locked work is never dropped and the
/// clock only moves forward.
#[derive(Debug, Default, Resource)]
pub struct LockBoard {
    pub locked: BTreeSet<BookingId>,
}

/// Recompute the locked set at `now`: every assigned booking whose pickup is
/// already past or inside the lock window. Each vehicle's availability moves
/// to the completion of its latest locked booking, never below `now`.
pub fn refresh_locks(
    fleet: &mut FleetRegistry,
    board: &BookingBoard,
    locks: &mut LockBoard,
    params: &DispatchParams,
    now: u32,
) {
    locks.locked.clear();
    let horizon = now + params.lock_window_min;

    for vehicle in fleet.iter_mut() {
        let mut free_at = now;
        for id in &vehicle.plan {
            let Some(booking) = board.get(*id) else {
                continue;
            };
            if booking.pickup_min <= horizon {
                locks.locked.insert(*id);
                free_at = free_at.max(booking.completion_min(params.service_time_min));
            }
        }
        vehicle.available_from = free_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{Booking, BookingOrigin, VehicleClass};
    use crate::fleet::{Vehicle, VehicleId};
    use crate::geo::GeoPoint;

    fn board_with(pickups: &[(u64, u32)]) -> BookingBoard {
        let mut board = BookingBoard::default();
        for &(id, pickup_min) in pickups {
            board.insert(Booking {
                id: BookingId(id),
                class: VehicleClass(1),
                pickup: GeoPoint::new(0.0, 0.0),
                drop: GeoPoint::new(0.0, 0.1),
                pickup_min,
                distance_km: 5.0,
                travel_min: 30,
                origin: BookingOrigin::Scheduled,
            });
        }
        board
    }

    #[test]
    fn locks_inside_the_two_hour_window() {
        // At 07:00, an 08:30 pickup locks; a 09:30 pickup does not.
        let board = board_with(&[(1, 510), (2, 570)]);
        let mut vehicle = Vehicle::new(VehicleId(1), VehicleClass(1), GeoPoint::new(0.0, 0.0), 360);
        vehicle.plan = vec![BookingId(1), BookingId(2)];
        let mut fleet = FleetRegistry::from_vehicles(vec![vehicle]);
        let mut locks = LockBoard::default();
        let params = DispatchParams::default();

        refresh_locks(&mut fleet, &board, &mut locks, &params, 420);

        assert!(locks.locked.contains(&BookingId(1)));
        assert!(!locks.locked.contains(&BookingId(2)));
        // Availability follows the locked booking's completion: 510 + 30 + 30.
        assert_eq!(fleet.iter().next().expect("vehicle").available_from, 570);
    }

    #[test]
    fn availability_never_drops_below_now() {
        let board = board_with(&[]);
        let vehicle = Vehicle::new(VehicleId(1), VehicleClass(1), GeoPoint::new(0.0, 0.0), 360);
        let mut fleet = FleetRegistry::from_vehicles(vec![vehicle]);
        let mut locks = LockBoard::default();
        let params = DispatchParams::default();

        refresh_locks(&mut fleet, &board, &mut locks, &params, 600);
        assert_eq!(fleet.iter().next().expect("vehicle").available_from, 600);
    }

    #[test]
    fn locked_set_grows_with_the_clock() {
        let board = board_with(&[(1, 510), (2, 570), (3, 700)]);
        let mut vehicle = Vehicle::new(VehicleId(1), VehicleClass(1), GeoPoint::new(0.0, 0.0), 360);
        vehicle.plan = vec![BookingId(1), BookingId(2), BookingId(3)];
        let mut fleet = FleetRegistry::from_vehicles(vec![vehicle]);
        let mut locks = LockBoard::default();
        let params = DispatchParams::default();

        let mut previous = BTreeSet::new();
        for now in [360, 420, 480, 540, 600] {
            refresh_locks(&mut fleet, &board, &mut locks, &params, now);
            assert!(
                locks.locked.is_superset(&previous),
                "locked set shrank at {now}"
            );
            previous = locks.locked.clone();
        }
        assert_eq!(previous.len(), 3);
    }
}
