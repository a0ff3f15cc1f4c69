//! Console report: per-tick assignment tables and the end-of-day summary.
//!
//! The writers take any `Write` sink so the binary can tee the stream into a
//! log file. Layout is presentation only; the data is the contract.

use std::io::{self, Write};

use crate::booking::{BookingBoard, BookingId, BookingOrigin};
use crate::clock::format_hhmm;
use crate::fleet::VehicleId;
use crate::pricing::PricingTable;
use crate::telemetry::{DispatchTelemetry, TickSnapshot, VehicleSnapshot};

fn origin_tag(origin: BookingOrigin) -> &'static str {
    match origin {
        BookingOrigin::Scheduled => "SCHEDULED",
        BookingOrigin::Instant => "INSTANT",
    }
}

fn holder_of(snapshot: &TickSnapshot, id: BookingId) -> Option<&VehicleSnapshot> {
    snapshot.vehicles.iter().find(|v| v.plan.contains(&id))
}

fn write_vehicle_table(w: &mut impl Write, snapshot: &TickSnapshot) -> io::Result<()> {
    writeln!(
        w,
        "{:<10} {:<8} {:>8} {:>10} {:>9} {:>13} {:>11} {:>10} {:>10}",
        "Vehicle", "Class", "Bookings", "Active km", "Dead km", "Customer fare", "Driver pay",
        "Profit", "Efficiency"
    )?;
    writeln!(w, "{}", "-".repeat(98))?;
    for v in &snapshot.vehicles {
        if v.plan.is_empty() {
            continue;
        }
        let total = v.active_km + v.dead_km;
        let efficiency = if total > 0.0 { v.active_km / total * 100.0 } else { 0.0 };
        writeln!(
            w,
            "{:<10} {:<8} {:>8} {:>10.2} {:>9.2} {:>13.2} {:>11.2} {:>10.2} {:>9.1}%",
            v.id,
            v.class,
            v.plan.len(),
            v.active_km,
            v.dead_km,
            v.customer_fare,
            v.driver_pay,
            v.customer_fare - v.driver_pay,
            efficiency,
        )?;
    }
    let idle = snapshot.vehicles.iter().filter(|v| v.plan.is_empty()).count();
    writeln!(w, "Idle vehicles: {idle}")?;
    Ok(())
}

fn write_booking_table(
    w: &mut impl Write,
    snapshot: &TickSnapshot,
    board: &BookingBoard,
) -> io::Result<()> {
    writeln!(
        w,
        "{:<10} {:<8} {:>9} {:>8} {:<10} {:<10} {:<9}",
        "Booking", "Class", "Distance", "Pickup", "Vehicle", "Origin", "Lock"
    )?;
    writeln!(w, "{}", "-".repeat(72))?;

    let mut bookings: Vec<_> = board.iter().collect();
    bookings.sort_by_key(|b| (b.pickup_min, b.id));
    for b in bookings {
        let (vehicle, lock) = match holder_of(snapshot, b.id) {
            Some(v) => {
                let lock = if snapshot.locked.contains(&b.id) { "LOCKED" } else { "UNLOCKED" };
                (v.id.to_string(), lock)
            }
            None => ("UNASSIGNED".to_string(), "-"),
        };
        writeln!(
            w,
            "{:<10} {:<8} {:>9.1} {:>8} {:<10} {:<10} {:<9}",
            b.id,
            b.class,
            b.distance_km,
            format_hhmm(b.pickup_min),
            vehicle,
            origin_tag(b.origin),
            lock,
        )?;
    }
    Ok(())
}

fn write_totals(w: &mut impl Write, snapshot: &TickSnapshot) -> io::Result<()> {
    let t = &snapshot.totals;
    writeln!(w, "Customer fare: {:.2}   Driver pay: {:.2}   Profit: {:.2}", t.customer_fare, t.driver_pay, t.profit)?;
    writeln!(
        w,
        "Active km: {:.2}   Dead km: {:.2}   Efficiency: {:.1}%",
        t.active_km,
        t.dead_km,
        t.efficiency * 100.0
    )?;
    writeln!(
        w,
        "Assigned: {}   Unassigned: {}   Locked: {}",
        t.assigned,
        t.unassigned,
        snapshot.locked.len()
    )?;
    Ok(())
}

fn write_changes(
    w: &mut impl Write,
    snapshot: &TickSnapshot,
    previous: &TickSnapshot,
) -> io::Result<()> {
    let mut any = false;
    for v in &snapshot.vehicles {
        let before: Vec<BookingId> = previous
            .vehicles
            .iter()
            .find(|p| p.id == v.id)
            .map(|p| p.plan.clone())
            .unwrap_or_default();
        let added: Vec<BookingId> =
            v.plan.iter().filter(|id| !before.contains(id)).copied().collect();
        let removed: Vec<BookingId> =
            before.iter().filter(|id| !v.plan.contains(id)).copied().collect();
        if added.is_empty() && removed.is_empty() {
            continue;
        }
        any = true;
        write!(w, "  vehicle {}:", v.id)?;
        if !added.is_empty() {
            let ids: Vec<String> = added.iter().map(|id| id.to_string()).collect();
            write!(w, " +[{}]", ids.join(", "))?;
        }
        if !removed.is_empty() {
            let ids: Vec<String> = removed.iter().map(|id| id.to_string()).collect();
            write!(w, " -[{}]", ids.join(", "))?;
        }
        writeln!(w)?;
    }
    if !any {
        writeln!(w, "  no vehicle changed")?;
    }
    Ok(())
}

/// Render one tick. Ticks that surfaced nothing get a one-line status; ticks
/// that ran a reassignment get the newly-loaded list, the change summary
/// against `previous`, and the full tables.
pub fn write_tick_report(
    w: &mut impl Write,
    snapshot: &TickSnapshot,
    previous: Option<&TickSnapshot>,
    board: &BookingBoard,
) -> io::Result<()> {
    let at = format_hhmm(snapshot.at_min);
    if snapshot.newly_loaded.is_empty() && previous.is_some() {
        return writeln!(
            w,
            "[{at}] no new bookings; {} locked, {} assigned, {} unassigned",
            snapshot.locked.len(),
            snapshot.totals.assigned,
            snapshot.totals.unassigned,
        );
    }

    writeln!(w, "\n{}", "=".repeat(98))?;
    writeln!(w, "TICK {at} — {} newly loaded", snapshot.newly_loaded.len())?;
    writeln!(w, "{}", "=".repeat(98))?;

    if !snapshot.newly_loaded.is_empty() {
        for id in &snapshot.newly_loaded {
            if let Some(b) = board.get(*id) {
                writeln!(
                    w,
                    "  loaded booking {} ({}, {}) pickup {}",
                    b.id,
                    b.class,
                    origin_tag(b.origin),
                    format_hhmm(b.pickup_min)
                )?;
            }
        }
    }
    if let Some(previous) = previous {
        writeln!(w, "Changes since {}:", format_hhmm(previous.at_min))?;
        write_changes(w, snapshot, previous)?;
    }

    writeln!(w)?;
    write_vehicle_table(w, snapshot)?;
    writeln!(w)?;
    write_booking_table(w, snapshot, board)?;
    writeln!(w)?;
    write_totals(w, snapshot)
}

/// Render the end-of-day summary from the closing snapshot.
pub fn write_final_report(
    w: &mut impl Write,
    telemetry: &DispatchTelemetry,
    board: &BookingBoard,
    pricing: &PricingTable,
) -> io::Result<()> {
    let Some(snapshot) = telemetry.last() else {
        return writeln!(w, "no ticks ran");
    };

    writeln!(w, "\n{}", "=".repeat(98))?;
    writeln!(w, "FINAL SNAPSHOT — {}", format_hhmm(snapshot.at_min))?;
    writeln!(w, "{}", "=".repeat(98))?;
    write_vehicle_table(w, snapshot)?;
    writeln!(w)?;
    write_booking_table(w, snapshot, board)?;
    writeln!(w)?;
    write_totals(w, snapshot)?;

    let fallbacks = pricing.fallback_classes();
    if !fallbacks.is_empty() {
        let labels: Vec<String> = fallbacks.iter().map(|c| format!("class{c}")).collect();
        writeln!(w, "Priced at fallback rates: {}", labels.join(", "))?;
    }
    writeln!(w, "Ticks recorded: {}", telemetry.ticks.len())?;
    Ok(())
}
