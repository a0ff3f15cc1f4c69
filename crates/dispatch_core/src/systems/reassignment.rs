//! Reassignment system: run the three-pass pipeline on ticks that surfaced
//! new bookings.

use bevy_ecs::prelude::{Res, ResMut};

use crate::booking::BookingBoard;
use crate::clock::DispatchClock;
use crate::fleet::FleetRegistry;
use crate::locking::LockBoard;
use crate::pipeline::run_reassignment;
use crate::pricing::PricingTable;
use crate::scenario::DispatchParams;
use crate::systems::release::NewlyLoaded;

pub fn reassignment_system(
    clock: Res<DispatchClock>,
    params: Res<DispatchParams>,
    pricing: Res<PricingTable>,
    board: Res<BookingBoard>,
    newly: Res<NewlyLoaded>,
    locks: Res<LockBoard>,
    mut fleet: ResMut<FleetRegistry>,
) {
    if newly.0.is_empty() {
        return;
    }
    run_reassignment(
        &mut fleet,
        &locks.locked,
        &board,
        &pricing,
        &params,
        clock.now(),
    );
}
