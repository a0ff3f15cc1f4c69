//! Run a small synthetic day (no JSON inputs) and print the final totals.
//!
//! Run with: cargo run -p dispatch_core --example synthetic_day

use dispatch_core::clock::format_hhmm;
use dispatch_core::runner::{run_day, tick_schedule};
use dispatch_core::scenario::{build_world, DispatchParams};
use dispatch_core::telemetry::DispatchTelemetry;
use dispatch_core::test_helpers::{instant_at, scheduled_at, test_vehicle};

fn main() {
    let vehicles = vec![
        test_vehicle(1, 1, 0.0, 77.55),
        test_vehicle(2, 1, 0.0, 77.60),
        test_vehicle(3, 2, 0.0, 77.65),
        test_vehicle(4, 3, 0.0, 77.58),
    ];
    let scheduled = vec![
        scheduled_at(1, 1, 77.56, 420),
        scheduled_at(2, 1, 77.61, 480),
        scheduled_at(3, 2, 77.66, 540),
        scheduled_at(4, 1, 77.57, 660),
        scheduled_at(5, 3, 77.59, 720),
    ];
    let instants = vec![
        instant_at(10, 1, 77.58, 600),
        instant_at(11, 2, 77.63, 780),
        instant_at(12, 1, 77.60, 960),
    ];

    let mut world = build_world(
        vehicles,
        scheduled,
        instants,
        DispatchParams::default().with_seed(123).with_real_sleep(0.0),
    );
    let mut schedule = tick_schedule();
    run_day(&mut world, &mut schedule, |world| {
        let telemetry = world.resource::<DispatchTelemetry>();
        if let Some(tick) = telemetry.last() {
            println!(
                "[{}] loaded {:>2}  assigned {:>2}  unassigned {:>2}",
                format_hhmm(tick.at_min),
                tick.newly_loaded.len(),
                tick.totals.assigned,
                tick.totals.unassigned,
            );
        }
    });

    let telemetry = world.resource::<DispatchTelemetry>();
    let last = telemetry.last().expect("final snapshot");
    println!("--- Synthetic day (seed 123) ---");
    println!("Active km:     {:.2}", last.totals.active_km);
    println!("Dead km:       {:.2}", last.totals.dead_km);
    println!("Driver pay:    {:.2}", last.totals.driver_pay);
    println!("Customer fare: {:.2}", last.totals.customer_fare);
    println!("Profit:        {:.2}", last.totals.profit);
    println!("Efficiency:    {:.1}%", last.totals.efficiency * 100.0);
}
