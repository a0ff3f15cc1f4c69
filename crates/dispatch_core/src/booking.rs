//! Booking records and the board of bookings visible to the engine.

use std::collections::HashMap;
use std::fmt;

use bevy_ecs::prelude::Resource;
use serde::Serialize;

use crate::geo::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BookingId(pub u64);

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Required vehicle capability. The standard fleet runs classes 1..=9;
/// anything else is priced at fallback rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VehicleClass(pub u8);

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BookingOrigin {
    Scheduled,
    Instant,
}

/// One trip request. Immutable once loaded; bookings are never deleted.
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: BookingId,
    pub class: VehicleClass,
    pub pickup: GeoPoint,
    pub drop: GeoPoint,
    /// Pickup time in minutes since midnight.
    pub pickup_min: u32,
    /// Active trip distance in km, taken from the dataset.
    pub distance_km: f64,
    /// On-trip minutes.
    pub travel_min: u32,
    pub origin: BookingOrigin,
}

impl Booking {
    /// Minute at which the serving vehicle is free again.
    pub fn completion_min(&self, service_min: u32) -> u32 {
        self.pickup_min + self.travel_min + service_min
    }
}

/// Every booking the engine has seen so far. Scheduled bookings surface at
/// day start, instants when their load-time arrives; nothing leaves.
#[derive(Debug, Default, Resource)]
pub struct BookingBoard {
    bookings: Vec<Booking>,
    index: HashMap<BookingId, usize>,
}

impl BookingBoard {
    pub fn insert(&mut self, booking: Booking) {
        debug_assert!(
            !self.index.contains_key(&booking.id),
            "booking id must be unique"
        );
        self.index.insert(booking.id, self.bookings.len());
        self.bookings.push(booking);
    }

    pub fn get(&self, id: BookingId) -> Option<&Booking> {
        self.index.get(&id).map(|&i| &self.bookings[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Booking> {
        self.bookings.iter()
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}
