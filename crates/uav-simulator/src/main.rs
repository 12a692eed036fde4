//! UAV Fleet Simulator CLI
//!
//! Loads simulation parameters and waypoint commands, runs the fleet to
//! the time limit, and writes per-vehicle trajectory logs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uav_simulator::{
    CommandSchedule, FileTrajectorySink, FleetSimulation, MemoryTrajectorySink, SimulationConfig,
    SimulationReport,
};

#[derive(Parser, Debug)]
#[command(name = "uav-simulator")]
#[command(about = "Fixed-timestep waypoint simulation for a UAV fleet")]
struct Args {
    /// Simulation parameters file
    #[arg(short, long, default_value = "SimParams.ini")]
    params: PathBuf,

    /// Waypoint command file
    #[arg(short, long, default_value = "SimCmds.txt")]
    commands: PathBuf,

    /// Directory receiving the per-vehicle trajectory logs
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Run without writing trajectory files
    #[arg(long)]
    dry_run: bool,

    /// Print the end-of-run report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("uav_simulator=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let config = SimulationConfig::from_params_file(&args.params)
        .with_context(|| format!("loading parameters from {}", args.params.display()))?;
    let schedule = CommandSchedule::from_file(&args.commands)
        .with_context(|| format!("loading commands from {}", args.commands.display()))?;

    info!(
        "Simulating {} vehicles for {} time units (dt {}, {} commands)",
        config.fleet_size,
        config.time_limit,
        config.dt,
        schedule.len()
    );

    let mut simulation = FleetSimulation::new(&config, schedule);

    let report = if args.dry_run {
        let mut sink = MemoryTrajectorySink::new();
        simulation.run(&mut sink)?
    } else {
        let mut sink = FileTrajectorySink::new(&args.output_dir)?;
        simulation.run(&mut sink)?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn print_summary(report: &SimulationReport) {
    for vehicle in &report.vehicles {
        info!(
            "UAV {} | {} | pos ({:.2}, {:.2}) | azimuth {:.2}",
            vehicle.vehicle_id,
            vehicle.mode.as_str(),
            vehicle.x,
            vehicle.y,
            vehicle.azimuth_deg
        );
    }
}
