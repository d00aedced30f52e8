//! Ship of Fools
//!
//! Runs a seeded voyage north into the ice and records what the passengers
//! did while the ship went down.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ship_core::output::{render_epilogue, render_status};
use ship_core::{SimError, Simulation, Tuning};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "ship_of_fools")]
#[command(about = "An agent-based simulation of a ship sailing into the ice")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of days to simulate
    #[arg(long, default_value_t = 30)]
    days: u32,

    /// Tuning file (TOML); missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the event log, snapshots and report
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Days between status reports (0 disables them)
    #[arg(long, default_value_t = 5)]
    status_interval: u32,

    /// Print the effective tuning as TOML and exit
    #[arg(long)]
    dump_config: bool,

    /// Log per-character detail
    #[arg(long, short)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "ship_core=debug,ship_of_fools=debug"
    } else {
        "ship_core=info,ship_of_fools=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .init();
}

fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning, SimError> {
    match path {
        Some(path) => {
            let tuning = Tuning::from_file(path)?;
            info!(config = %path.display(), "loaded tuning");
            Ok(tuning)
        }
        None => Ok(Tuning::default()),
    }
}

fn run(args: &Args) -> Result<(), SimError> {
    let tuning = load_tuning(args.config.as_ref())?;

    if args.dump_config {
        println!("{}", tuning.to_toml()?);
        return Ok(());
    }

    println!("SHIP OF FOOLS - SOCIAL SIMULATION");
    println!("The ship heads north into dangerous waters...");
    println!("Will anyone listen to reason before it's too late?");
    println!();
    info!(seed = args.seed, days = args.days, "starting voyage");

    let mut sim = Simulation::new(args.seed, tuning);
    sim.record_to(&args.output_dir)?;
    sim.snapshot("simulation_start");

    for _ in 0..args.days {
        if sim.is_over() {
            break;
        }
        let day = sim.ship().day;
        let events = sim.run_day()?;
        info!(day, events = events.len(), "day complete");

        if args.status_interval > 0 && day % args.status_interval == 0 && !sim.is_over() {
            println!("\n{}", render_status(&sim.status()));
        }
    }

    let report = sim.finish()?;
    println!("\n{}", render_epilogue(&report));
    println!("Output written to {}", args.output_dir.display());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
