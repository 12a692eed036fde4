//! # UAV Simulator
//!
//! Fixed-timestep kinematic simulator for a fleet of waypoint-commanded
//! fixed-wing UAVs.
//!
//! ## Features
//!
//! - Turn-rate-limited heading control toward assigned targets
//! - Clockwise holding pattern at a fixed radius after arrival
//! - Time-ordered, exactly-once waypoint command dispatch
//! - Per-vehicle append-only trajectory logs

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod fleet;
pub mod schedule;
pub mod trajectory;
pub mod vehicle;

pub use config::{InitialState, SimulationConfig};
pub use error::{Result, SimulatorError};
pub use fleet::{FleetSimulation, SimulationReport};
pub use schedule::CommandSchedule;
pub use trajectory::{FileTrajectorySink, MemoryTrajectorySink, TrajectorySink};
pub use vehicle::Vehicle;
