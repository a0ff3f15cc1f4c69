//! Route cost kernel: active km, dead km in its rolling and closed forms,
//! driver pay and customer fare.
//!
//! The rolling dead-km form (no return-home leg) is what assignment
//! hypotheticals and mid-day state use; the home leg is booked exactly once
//! per reassignment run by [apply_home_leg].

use crate::booking::{Booking, BookingBoard, VehicleClass};
use crate::fleet::Vehicle;
use crate::geo::{distance_km, GeoPoint};
use crate::pricing::PricingTable;

/// Dead km of a route that is still open for insertion: home to first pickup
/// plus every drop-to-next-pickup leg.
pub fn rolling_dead_km(route: &[GeoPoint], home: GeoPoint) -> f64 {
    if route.len() < 2 {
        return 0.0;
    }
    let mut dead = distance_km(home, route[0]);
    let mut i = 1;
    while i + 1 < route.len() {
        dead += distance_km(route[i], route[i + 1]);
        i += 2;
    }
    dead
}

/// Dead km of a closed route: the rolling form plus the last-drop-to-home leg.
pub fn closed_dead_km(route: &[GeoPoint], home: GeoPoint) -> f64 {
    match route.last() {
        Some(&last) => rolling_dead_km(route, home) + distance_km(last, home),
        None => 0.0,
    }
}

/// Rebuild a vehicle's route and totals from its plan, in the rolling form.
/// The plan is re-sorted by pickup time (ties by id) first.
pub fn rebuild_vehicle(vehicle: &mut Vehicle, board: &BookingBoard, pricing: &PricingTable) {
    vehicle.plan.sort_by_key(|id| {
        let pickup = board.get(*id).map(|b| b.pickup_min).unwrap_or(u32::MAX);
        (pickup, id.0)
    });

    vehicle.route.clear();
    let mut active = 0.0;
    for id in &vehicle.plan {
        if let Some(booking) = board.get(*id) {
            vehicle.route.push(booking.pickup);
            vehicle.route.push(booking.drop);
            active += booking.distance_km;
        }
    }

    vehicle.active_km = active;
    vehicle.dead_km = rolling_dead_km(&vehicle.route, vehicle.home);
    let rates = pricing.rates(vehicle.class);
    vehicle.driver_pay = active * rates.active_pay + vehicle.dead_km * rates.dead_pay;
}

/// Close a vehicle's day: book the return-home leg into dead km and pay.
/// Empty plans get no leg.
pub fn apply_home_leg(vehicle: &mut Vehicle, pricing: &PricingTable) {
    let Some(last) = vehicle.last_drop() else {
        return;
    };
    let leg = distance_km(last, vehicle.home);
    vehicle.dead_km += leg;
    vehicle.driver_pay += leg * pricing.rates(vehicle.class).dead_pay;
}

/// Customer fare for one booking served by a vehicle of `class`: the active
/// distance plus the class's assumed dead share, at the class's price.
pub fn booking_fare(booking: &Booking, class: VehicleClass, pricing: &PricingTable) -> f64 {
    let rates = pricing.rates(class);
    (booking.distance_km + booking.distance_km * rates.dead_ratio) * rates.customer_price
}

/// Fare across a vehicle's whole plan.
pub fn vehicle_fare(vehicle: &Vehicle, board: &BookingBoard, pricing: &PricingTable) -> f64 {
    vehicle
        .plan
        .iter()
        .filter_map(|id| board.get(*id))
        .map(|b| booking_fare(b, vehicle.class, pricing))
        .sum()
}

/// Share of kilometres driven with a passenger aboard.
pub fn efficiency(active_km: f64, dead_km: f64) -> f64 {
    let total = active_km + dead_km;
    if total > 0.0 {
        active_km / total
    } else {
        0.0
    }
}
