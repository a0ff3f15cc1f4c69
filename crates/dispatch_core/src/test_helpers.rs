//! Shared builders for unit and integration tests.

use crate::booking::{Booking, BookingId, BookingOrigin, VehicleClass};
use crate::fleet::{Vehicle, VehicleId};
use crate::geo::GeoPoint;
use crate::scenario::DispatchParams;

/// Params with pacing disabled, for tests that run whole days.
pub fn test_params() -> DispatchParams {
    DispatchParams::default().with_real_sleep(0.0)
}

pub fn test_vehicle(id: u64, class: u8, lat: f64, lng: f64) -> Vehicle {
    let params = DispatchParams::default();
    Vehicle::new(
        VehicleId(id),
        VehicleClass(class),
        GeoPoint::new(lat, lng),
        params.day_start_min,
    )
}

#[allow(clippy::too_many_arguments)]
pub fn test_booking(
    id: u64,
    class: u8,
    pickup: (f64, f64),
    drop: (f64, f64),
    pickup_min: u32,
    distance_km: f64,
    travel_min: u32,
    origin: BookingOrigin,
) -> Booking {
    Booking {
        id: BookingId(id),
        class: VehicleClass(class),
        pickup: GeoPoint::new(pickup.0, pickup.1),
        drop: GeoPoint::new(drop.0, drop.1),
        pickup_min,
        distance_km,
        travel_min,
        origin,
    }
}

/// A scheduled booking along the equator: pickup at `lng`, drop 0.05 east.
pub fn scheduled_at(id: u64, class: u8, lng: f64, pickup_min: u32) -> Booking {
    test_booking(
        id,
        class,
        (0.0, lng),
        (0.0, lng + 0.05),
        pickup_min,
        7.0,
        30,
        BookingOrigin::Scheduled,
    )
}

/// The instant twin of [scheduled_at].
pub fn instant_at(id: u64, class: u8, lng: f64, pickup_min: u32) -> Booking {
    test_booking(
        id,
        class,
        (0.0, lng),
        (0.0, lng + 0.05),
        pickup_min,
        7.0,
        30,
        BookingOrigin::Instant,
    )
}
