//! Locking system: run the gate at the current tick.

use bevy_ecs::prelude::{Res, ResMut};

use crate::booking::BookingBoard;
use crate::clock::DispatchClock;
use crate::fleet::FleetRegistry;
use crate::locking::{refresh_locks, LockBoard};
use crate::scenario::DispatchParams;

pub fn locking_system(
    clock: Res<DispatchClock>,
    params: Res<DispatchParams>,
    board: Res<BookingBoard>,
    mut fleet: ResMut<FleetRegistry>,
    mut locks: ResMut<LockBoard>,
) {
    refresh_locks(&mut fleet, &board, &mut locks, &params, clock.now());
}
