//! Day-dispatch CLI: load the three JSON datasets, drive the tick loop, and
//! print the rolling report. Any startup error exits non-zero; the report
//! stream can be teed into a log file.

use std::error::Error;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use dispatch_core::booking::{BookingBoard, BookingOrigin};
use dispatch_core::clock::DispatchClock;
use dispatch_core::input::{load_bookings, load_vehicles};
use dispatch_core::pricing::PricingTable;
use dispatch_core::report::{write_final_report, write_tick_report};
use dispatch_core::runner::{run_day, tick_schedule};
use dispatch_core::scenario::{build_world, DispatchParams};
use dispatch_core::telemetry::DispatchTelemetry;

#[derive(Parser)]
#[command(
    name = "dispatch",
    about = "Home-fleet dispatch simulator",
    long_about = "Assigns the scheduled bookings at day start, then replans\n\
                  every tick as instant bookings surface, and prints the\n\
                  rolling assignment report."
)]
struct Cli {
    /// Vehicle dataset
    #[arg(long, default_value = "data/vehicles.json")]
    vehicles: PathBuf,
    /// Scheduled-bookings dataset
    #[arg(long, default_value = "data/bookings.json")]
    bookings: PathBuf,
    /// Instant-bookings dataset
    #[arg(long, default_value = "data/instant_bookings.json")]
    instants: PathBuf,
    /// Seed for the instant load-time draw
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Simulated minutes per tick
    #[arg(long, default_value_t = 30)]
    tick_minutes: u32,
    /// Wall-clock seconds to pause between ticks (0 disables pacing)
    #[arg(long, default_value_t = 6.0)]
    sleep_secs: f64,
    /// Duplicate the report into this file
    #[arg(long)]
    log: Option<PathBuf>,
    /// Write the full telemetry as JSON when the day ends
    #[arg(long)]
    export: Option<PathBuf>,
}

/// Writes to stdout and, when configured, a log file as well.
struct Tee {
    log: Option<File>,
}

impl Tee {
    fn new(path: Option<&PathBuf>) -> io::Result<Self> {
        let log = path.map(File::create).transpose()?;
        Ok(Self { log })
    }
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        if let Some(log) = &mut self.log {
            log.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Some(log) = &mut self.log {
            log.flush()?;
        }
        Ok(())
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("dispatch: {err}");
        exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let params = DispatchParams::default()
        .with_seed(cli.seed)
        .with_tick_step(cli.tick_minutes)
        .with_real_sleep(cli.sleep_secs);

    let vehicles = load_vehicles(&cli.vehicles, params.day_start_min)?;
    let scheduled = load_bookings(&cli.bookings, BookingOrigin::Scheduled)?;
    let instants = load_bookings(&cli.instants, BookingOrigin::Instant)?;

    let mut out = Tee::new(cli.log.as_ref())?;
    writeln!(
        out,
        "Loaded {} vehicles, {} scheduled bookings, {} instant bookings (seed {})",
        vehicles.len(),
        scheduled.len(),
        instants.len(),
        cli.seed,
    )?;

    let mut world = build_world(vehicles, scheduled, instants, params);
    let mut schedule = tick_schedule();

    let total_ticks = world.resource::<DispatchClock>().ticks_total() as u64 + 1;
    let progress = ProgressBar::new(total_ticks);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] tick {pos}/{len}")
            .expect("progress template")
            .progress_chars("#>-"),
    );

    let mut previous_index: Option<usize> = None;
    run_day(&mut world, &mut schedule, |world| {
        let telemetry = world.resource::<DispatchTelemetry>();
        let board = world.resource::<BookingBoard>();
        if let Some(tick) = telemetry.last() {
            let previous = previous_index.and_then(|i| telemetry.ticks.get(i));
            write_tick_report(&mut out, tick, previous, board).expect("report stream");
        }
        previous_index = Some(telemetry.ticks.len() - 1);
        progress.inc(1);
    });
    progress.finish_and_clear();

    let telemetry = world.resource::<DispatchTelemetry>();
    let board = world.resource::<BookingBoard>();
    let pricing = world.resource::<PricingTable>();
    write_final_report(&mut out, telemetry, board, pricing)?;

    if let Some(path) = &cli.export {
        serde_json::to_writer_pretty(File::create(path)?, telemetry)?;
        writeln!(out, "Telemetry written to {}", path.display())?;
    }
    Ok(())
}
