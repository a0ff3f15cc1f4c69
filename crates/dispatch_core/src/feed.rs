//! Booking release feed.
//!
//! Scheduled bookings surface on the first tick of the day. Instant bookings
//! surface at a load-time drawn once, at queueing, from the window between
//! two hours and one hour ahead of their pickup; the draw comes from a single
//! seeded generator so a run is reproducible from its seed.

use bevy_ecs::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::booking::Booking;

/// Widest lead, minutes before pickup, at which an instant may surface.
const MAX_LOAD_LEAD_MIN: u32 = 120;
/// Narrowest lead, minutes before pickup, at which an instant may surface.
const MIN_LOAD_LEAD_MIN: u32 = 60;

#[derive(Debug, Clone)]
struct FeedEntry {
    booking: Booking,
    load_min: u32,
    released: bool,
}

#[derive(Debug, Default, Resource)]
pub struct BookingFeed {
    entries: Vec<FeedEntry>,
}

impl BookingFeed {
    /// Queue day-start bookings; they all surface on the first tick.
    pub fn queue_scheduled(&mut self, bookings: Vec<Booking>, day_start: u32) {
        for booking in bookings {
            self.entries.push(FeedEntry {
                booking,
                load_min: day_start,
                released: false,
            });
        }
    }

    /// Queue instant bookings with their seeded load-times.
    pub fn queue_instants(&mut self, bookings: Vec<Booking>, day_start: u32, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        for booking in bookings {
            let earliest = day_start.max(booking.pickup_min.saturating_sub(MAX_LOAD_LEAD_MIN));
            let latest = booking.pickup_min.saturating_sub(MIN_LOAD_LEAD_MIN);
            let load_min = if latest > earliest {
                rng.gen_range(earliest..=latest)
            } else {
                earliest
            };
            self.entries.push(FeedEntry {
                booking,
                load_min,
                released: false,
            });
        }
    }

    /// Release every entry due at `now` that has not surfaced yet.
    pub fn release_due(&mut self, now: u32) -> Vec<Booking> {
        let mut released = Vec::new();
        for entry in self.entries.iter_mut() {
            if !entry.released && entry.load_min <= now {
                entry.released = true;
                released.push(entry.booking.clone());
            }
        }
        released
    }

    /// Entries still waiting for their load-time.
    pub fn pending(&self) -> usize {
        self.entries.iter().filter(|e| !e.released).count()
    }
}
