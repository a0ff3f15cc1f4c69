//! Release system: surface every booking whose load-time has arrived.

use bevy_ecs::prelude::{Res, ResMut, Resource};

use crate::booking::{BookingBoard, BookingId};
use crate::clock::DispatchClock;
use crate::feed::BookingFeed;

/// Ids that surfaced this tick. Cleared at the start of every tick; the
/// reassignment system only runs when this is non-empty.
#[derive(Debug, Default, Resource)]
pub struct NewlyLoaded(pub Vec<BookingId>);

pub fn booking_release_system(
    clock: Res<DispatchClock>,
    mut feed: ResMut<BookingFeed>,
    mut board: ResMut<BookingBoard>,
    mut newly: ResMut<NewlyLoaded>,
) {
    newly.0.clear();
    for booking in feed.release_due(clock.now()) {
        newly.0.push(booking.id);
        board.insert(booking);
    }
}
