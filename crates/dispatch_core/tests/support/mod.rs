#![allow(dead_code)]

use bevy_ecs::prelude::World;

use dispatch_core::booking::Booking;
use dispatch_core::fleet::Vehicle;
use dispatch_core::runner::{run_day, tick_schedule};
use dispatch_core::scenario::{build_world, DispatchParams};

/// Build a world and drive it through a whole day with pacing disabled.
pub fn run_full_day(
    vehicles: Vec<Vehicle>,
    scheduled: Vec<Booking>,
    instants: Vec<Booking>,
    params: DispatchParams,
) -> World {
    let mut world = build_world(vehicles, scheduled, instants, params.with_real_sleep(0.0));
    let mut schedule = tick_schedule();
    run_day(&mut world, &mut schedule, |_| {});
    world
}
