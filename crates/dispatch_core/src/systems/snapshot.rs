//! Snapshot system: record the tick's assignment state into telemetry.

use bevy_ecs::prelude::{Res, ResMut};

use crate::booking::BookingBoard;
use crate::clock::DispatchClock;
use crate::fleet::FleetRegistry;
use crate::locking::LockBoard;
use crate::pricing::PricingTable;
use crate::systems::release::NewlyLoaded;
use crate::telemetry::{DispatchTelemetry, TickSnapshot};

pub fn snapshot_system(
    clock: Res<DispatchClock>,
    board: Res<BookingBoard>,
    fleet: Res<FleetRegistry>,
    locks: Res<LockBoard>,
    newly: Res<NewlyLoaded>,
    pricing: Res<PricingTable>,
    mut telemetry: ResMut<DispatchTelemetry>,
) {
    let snapshot = TickSnapshot::capture(
        clock.now(),
        newly.0.clone(),
        &fleet,
        &board,
        &locks,
        &pricing,
    );
    telemetry.record(snapshot);
}
