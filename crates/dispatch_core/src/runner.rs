//! Tick driver: builds the per-tick schedule, advances the day, closes it
//! out with the sweep and a final snapshot.
//!
//! Clock progression happens here, outside systems. Each tick runs the
//! schedule at the clock's current time; the cosmetic inter-tick sleep and
//! the end-of-day sweep live here too, so the systems stay pure state
//! transitions.

use std::thread;
use std::time::Duration;

use bevy_ecs::prelude::{Mut, Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;

use crate::booking::BookingBoard;
use crate::clock::DispatchClock;
use crate::fleet::FleetRegistry;
use crate::locking::LockBoard;
use crate::pipeline::final_sweep;
use crate::pricing::PricingTable;
use crate::scenario::DispatchParams;
use crate::systems::locking::locking_system;
use crate::systems::reassignment::reassignment_system;
use crate::systems::release::booking_release_system;
use crate::systems::snapshot::snapshot_system;
use crate::telemetry::{DispatchTelemetry, TickSnapshot};

/// The per-tick schedule: release due bookings, refresh locks, reassign when
/// anything surfaced, snapshot. Order is fixed.
pub fn tick_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            booking_release_system,
            locking_system,
            reassignment_system,
            snapshot_system,
        )
            .chain(),
    );
    schedule
}

/// Run the schedule once at the clock's current time. Returns `false` when
/// the clock has already passed day end.
pub fn run_tick(world: &mut World, schedule: &mut Schedule) -> bool {
    if world.resource::<DispatchClock>().is_over() {
        return false;
    }
    schedule.run(world);
    true
}

/// Drive a full day: one tick per step with the inter-tick pause, then the
/// end-of-day sweep and a closing snapshot. The observer sees the world after
/// every tick and once more after the sweep.
pub fn run_day(world: &mut World, schedule: &mut Schedule, mut observer: impl FnMut(&World)) {
    loop {
        if !run_tick(world, schedule) {
            break;
        }
        observer(world);
        let advanced = world.resource_mut::<DispatchClock>().advance();
        if !advanced {
            break;
        }
        let sleep_secs = world.resource::<DispatchParams>().real_sleep_secs;
        if sleep_secs > 0.0 {
            thread::sleep(Duration::from_secs_f64(sleep_secs));
        }
    }
    close_day(world);
    observer(world);
}

/// End-of-day close-out: run the best-effort sweep over whatever stayed
/// unassigned and record the final snapshot.
pub fn close_day(world: &mut World) {
    world.resource_scope(|world, mut fleet: Mut<FleetRegistry>| {
        let board = world.resource::<BookingBoard>();
        let pricing = world.resource::<PricingTable>();
        let params = world.resource::<DispatchParams>();
        final_sweep(&mut fleet, board, pricing, params);
    });

    let snapshot = {
        let clock = world.resource::<DispatchClock>();
        let fleet = world.resource::<FleetRegistry>();
        let board = world.resource::<BookingBoard>();
        let locks = world.resource::<LockBoard>();
        let pricing = world.resource::<PricingTable>();
        TickSnapshot::capture(clock.now(), Vec::new(), fleet, board, locks, pricing)
    };
    world.resource_mut::<DispatchTelemetry>().record(snapshot);
}
