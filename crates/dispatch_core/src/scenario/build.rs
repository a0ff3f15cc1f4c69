//! World assembly: insert every engine resource and queue the day's bookings.

use bevy_ecs::prelude::World;

use crate::booking::{Booking, BookingBoard};
use crate::clock::DispatchClock;
use crate::feed::BookingFeed;
use crate::fleet::{FleetRegistry, Vehicle};
use crate::locking::LockBoard;
use crate::pricing::PricingTable;
use crate::scenario::DispatchParams;
use crate::systems::release::NewlyLoaded;
use crate::telemetry::DispatchTelemetry;

/// Build a ready-to-run world. Scheduled bookings surface on the first tick,
/// instants at their seeded load-times.
pub fn build_world(
    vehicles: Vec<Vehicle>,
    scheduled: Vec<Booking>,
    instants: Vec<Booking>,
    params: DispatchParams,
) -> World {
    let mut feed = BookingFeed::default();
    feed.queue_scheduled(scheduled, params.day_start_min);
    feed.queue_instants(instants, params.day_start_min, params.seed);

    let mut world = World::new();
    world.insert_resource(DispatchClock::new(
        params.day_start_min,
        params.day_end_min,
        params.tick_step_min,
    ));
    world.insert_resource(FleetRegistry::from_vehicles(vehicles));
    world.insert_resource(BookingBoard::default());
    world.insert_resource(LockBoard::default());
    world.insert_resource(NewlyLoaded::default());
    world.insert_resource(PricingTable::default());
    world.insert_resource(DispatchTelemetry::default());
    world.insert_resource(feed);
    world.insert_resource(params);
    world
}
