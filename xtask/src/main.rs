use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the dispatch workspace",
    long_about = "A unified CLI for running the simulator, the synthetic\n\
                  example, benchmarks, and CI checks."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dispatch simulator against data/ with default settings
    Run,
    /// Run the synthetic day example (no JSON inputs needed)
    Synthetic,
    /// Run Criterion benchmarks
    Bench,
    /// Run CI checks (fmt, clippy, tests)
    Ci,
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run => {
            run_cargo(&["run", "-p", "dispatch_cli", "--release"]);
        }
        Commands::Synthetic => {
            run_cargo(&["run", "-p", "dispatch_core", "--example", "synthetic_day"]);
        }
        Commands::Bench => {
            run_cargo(&["bench", "-p", "dispatch_core"]);
        }
        Commands::Ci => {
            run_cargo(&["fmt", "--all", "--check"]);
            run_cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"]);
            run_cargo(&["test", "--workspace"]);
        }
    }
}

fn run_cargo(args: &[&str]) {
    let status = Command::new("cargo")
        .args(args)
        .status()
        .unwrap_or_else(|err| {
            eprintln!("xtask: failed to spawn cargo {}: {err}", args.join(" "));
            exit(1);
        });
    check(status, &format!("cargo {}", args.join(" ")));
}

fn check(status: ExitStatus, what: &str) {
    if !status.success() {
        eprintln!("xtask: {what} failed");
        exit(status.code().unwrap_or(1));
    }
}
