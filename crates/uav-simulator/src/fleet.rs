//! Fleet-level simulation driver.
//!
//! Owns the fleet, the command schedule, and the clock. Each tick runs in
//! a fixed order that the holding transition depends on: dispatch due
//! commands, advance every vehicle, emit one trajectory sample per
//! vehicle, then step the clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uav_domain::{FlightMode, Position, VehicleId};

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::schedule::CommandSchedule;
use crate::trajectory::TrajectorySink;
use crate::vehicle::Vehicle;

/// Final state of one vehicle at the end of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleSummary {
    pub vehicle_id: VehicleId,
    pub mode: FlightMode,
    pub x: f64,
    pub y: f64,
    pub azimuth_deg: f64,
}

/// End-of-run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub started_at: DateTime<Utc>,
    pub ticks: u64,
    pub sim_time: f64,
    pub commands_applied: usize,
    pub vehicles: Vec<VehicleSummary>,
}

/// Simulation driver: advances the whole fleet in fixed `dt` steps until
/// the time limit.
pub struct FleetSimulation {
    fleet: Vec<Vehicle>,
    schedule: CommandSchedule,
    dt: f64,
    time_limit: f64,
    current_time: f64,
}

impl FleetSimulation {
    /// Build the fleet from the shared initial state, ids `0..fleet_size`.
    pub fn new(config: &SimulationConfig, schedule: CommandSchedule) -> Self {
        let initial = config.initial;
        let fleet = (0..config.fleet_size)
            .map(|id| {
                Vehicle::new(
                    id,
                    Position::new(initial.x, initial.y, initial.z),
                    initial.velocity,
                    initial.azimuth_deg,
                    initial.turning_radius,
                )
            })
            .collect();

        Self {
            fleet,
            schedule,
            dt: config.dt,
            time_limit: config.time_limit,
            current_time: 0.0,
        }
    }

    pub fn fleet(&self) -> &[Vehicle] {
        &self.fleet
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Run to the time limit, emitting every vehicle's sample to `sink`
    /// each tick. Sink I/O errors abort the run; nothing else in the loop
    /// can fail.
    pub fn run(&mut self, sink: &mut dyn TrajectorySink) -> Result<SimulationReport> {
        let started_at = Utc::now();
        let mut ticks = 0u64;
        let mut commands_applied = 0usize;

        info!(
            vehicles = self.fleet.len(),
            commands = self.schedule.pending(),
            dt = self.dt,
            time_limit = self.time_limit,
            "starting simulation"
        );

        while self.current_time < self.time_limit {
            commands_applied += self.dispatch_due_commands();

            for vehicle in &mut self.fleet {
                vehicle.advance(self.dt);
            }
            for vehicle in &self.fleet {
                sink.record(vehicle.id(), vehicle.sample(self.current_time))?;
            }

            self.current_time += self.dt;
            ticks += 1;
        }
        sink.flush()?;

        info!(ticks, commands_applied, "simulation complete");

        Ok(SimulationReport {
            started_at,
            ticks,
            sim_time: self.current_time,
            commands_applied,
            vehicles: self
                .fleet
                .iter()
                .map(|v| VehicleSummary {
                    vehicle_id: v.id(),
                    mode: v.mode(),
                    x: v.position().x,
                    y: v.position().y,
                    azimuth_deg: v.azimuth_deg(),
                })
                .collect(),
        })
    }

    /// Apply every newly due command to its vehicle. Commands addressing
    /// ids outside the fleet are ignored.
    fn dispatch_due_commands(&mut self) -> usize {
        let mut applied = 0;
        for cmd in self.schedule.take_due(self.current_time) {
            match self.fleet.iter_mut().find(|v| v.id() == cmd.vehicle_id) {
                Some(vehicle) => {
                    debug!(
                        time = cmd.time,
                        vehicle = cmd.vehicle_id,
                        x = cmd.target_x,
                        y = cmd.target_y,
                        "assigning target"
                    );
                    vehicle.assign_target(cmd.target_x, cmd.target_y);
                    applied += 1;
                }
                None => {
                    warn!(vehicle = cmd.vehicle_id, "command addresses unknown vehicle, ignoring");
                }
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InitialState;
    use crate::trajectory::MemoryTrajectorySink;
    use uav_domain::Command;

    fn config(fleet_size: u32, time_limit: f64) -> SimulationConfig {
        SimulationConfig {
            dt: 1.0,
            time_limit,
            fleet_size,
            initial: InitialState {
                x: 0.0,
                y: 0.0,
                z: 0.0,
                velocity: 10.0,
                azimuth_deg: 0.0,
                turning_radius: 50.0,
            },
        }
    }

    fn run(
        config: &SimulationConfig,
        commands: Vec<Command>,
    ) -> (SimulationReport, MemoryTrajectorySink) {
        let mut sim = FleetSimulation::new(config, CommandSchedule::new(commands));
        let mut sink = MemoryTrajectorySink::new();
        let report = sim.run(&mut sink).unwrap();
        (report, sink)
    }

    #[test]
    fn test_unassigned_fleet_flies_straight() {
        let (report, sink) = run(&config(2, 10.0), vec![]);

        assert_eq!(report.ticks, 10);
        assert_eq!(sink.vehicle_count(), 2);
        for id in 0..2 {
            let track = sink.track(id);
            assert_eq!(track.len(), 10);
            for (tick, point) in track.iter().enumerate() {
                // one 10-unit step along azimuth 0 per tick, sampled after moving
                assert!((point.x - 10.0 * (tick as f64 + 1.0)).abs() < 1e-9);
                assert!(point.y.abs() < 1e-9);
                assert_eq!(point.azimuth_deg, 0.0);
                assert_eq!(point.time, tick as f64);
            }
        }
    }

    #[test]
    fn test_reaches_target_then_holds_at_fixed_center() {
        let command = Command { time: 0.0, vehicle_id: 0, target_x: 100.0, target_y: 0.0 };
        let (report, sink) = run(&config(1, 40.0), vec![command]);

        let track = sink.track(0);
        let arrival = track
            .iter()
            .position(|p| ((p.x - 100.0).powi(2) + p.y.powi(2)).sqrt() <= 1.0)
            .expect("vehicle never reached the target region");

        // arrival azimuth is 0, so the center sits one radius below the target
        let (center_x, center_y) = (100.0, -50.0);
        for point in &track[arrival + 1..] {
            let distance = ((point.x - center_x).powi(2) + (point.y - center_y).powi(2)).sqrt();
            assert!((distance - 50.0).abs() < 1e-6, "off-circle at t={}", point.time);
        }

        assert_eq!(report.vehicles[0].mode, FlightMode::Holding);
        assert_eq!(report.commands_applied, 1);
    }

    #[test]
    fn test_duplicate_commands_do_not_disturb_loiter() {
        let target = (100.0, 0.0);
        let duplicate = |time| Command {
            time,
            vehicle_id: 0,
            target_x: target.0,
            target_y: target.1,
        };
        // re-issued while transiting and again mid-loiter
        let (_, sink) = run(&config(1, 40.0), vec![duplicate(0.0), duplicate(5.0), duplicate(20.0)]);

        let track = sink.track(0);
        let (center_x, center_y) = (100.0, -50.0);
        for point in track.iter().filter(|p| p.time >= 11.0) {
            let distance = ((point.x - center_x).powi(2) + (point.y - center_y).powi(2)).sqrt();
            assert!((distance - 50.0).abs() < 1e-6, "loiter disturbed at t={}", point.time);
        }
    }

    #[test]
    fn test_unknown_vehicle_id_is_ignored() {
        let stray = Command { time: 0.0, vehicle_id: 5, target_x: 1.0, target_y: 1.0 };
        let (with_stray, sink_stray) = run(&config(2, 10.0), vec![stray]);
        let (_, sink_clean) = run(&config(2, 10.0), vec![]);

        assert_eq!(with_stray.commands_applied, 0);
        for id in 0..2 {
            assert_eq!(sink_stray.track(id), sink_clean.track(id));
            assert_eq!(with_stray.vehicles[id as usize].mode, FlightMode::Unassigned);
        }
    }

    #[test]
    fn test_command_due_mid_run_redirects_vehicle() {
        let command = Command { time: 3.0, vehicle_id: 0, target_x: 500.0, target_y: 500.0 };
        let (report, sink) = run(&config(1, 10.0), vec![command]);

        let track = sink.track(0);
        // straight until the trigger tick, then the heading starts bending
        assert_eq!(track[2].azimuth_deg, 0.0);
        assert!(track[3].azimuth_deg > 0.0);
        assert_eq!(report.vehicles[0].mode, FlightMode::Transiting);
    }

    #[test]
    fn test_tick_count_honors_time_limit() {
        let (report, _) = run(&config(1, 10.0), vec![]);
        assert_eq!(report.ticks, 10);
        assert_eq!(report.sim_time, 10.0);
    }
}
