//! Simulation parameters: file format, loading, validation.
//!
//! Parameter files hold one `Key = value` per line. Lines that do not
//! parse are skipped; unknown keys are ignored. Missing or out-of-range
//! required keys are a configuration error rather than a silent zero
//! default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SimulatorError};

/// Shared initial kinematic state applied to every vehicle in the fleet.
/// Per-vehicle initial state would slot in here as a list of records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub velocity: f64,
    pub azimuth_deg: f64,
    pub turning_radius: f64,
}

/// Validated simulation configuration, consumed once at fleet construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Tick size in simulation-clock units. Positive.
    pub dt: f64,
    /// Simulation stops once the clock reaches this. Positive.
    pub time_limit: f64,
    pub fleet_size: u32,
    pub initial: InitialState,
}

impl SimulationConfig {
    /// Load and validate a parameter file.
    pub fn from_params_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| SimulatorError::Setup {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse `Key = value` lines. Recognized keys: `Dt`, `TimeLim`,
    /// `N_uav`, `V0`, `R` (required) and `X0`, `Y0`, `Z0`, `Az`
    /// (optional, default 0.0).
    pub fn parse(contents: &str) -> Result<Self> {
        let mut dt = None;
        let mut time_limit = None;
        let mut fleet_size = None;
        let mut velocity = None;
        let mut turning_radius = None;
        let mut x = 0.0;
        let mut y = 0.0;
        let mut z = 0.0;
        let mut azimuth_deg = 0.0;

        for (index, line) in contents.lines().enumerate() {
            let Some((key, value)) = parse_entry(line) else {
                if !line.trim().is_empty() {
                    debug!(line = index + 1, "skipping unparseable parameter line");
                }
                continue;
            };
            match key {
                "Dt" => dt = Some(value),
                "TimeLim" => time_limit = Some(value),
                "N_uav" => fleet_size = Some(value),
                "V0" => velocity = Some(value),
                "R" => turning_radius = Some(value),
                "X0" => x = value,
                "Y0" => y = value,
                "Z0" => z = value,
                "Az" => azimuth_deg = value,
                other => debug!(key = other, "ignoring unknown parameter"),
            }
        }

        let dt = require_positive("Dt", dt)?;
        let time_limit = require_positive("TimeLim", time_limit)?;
        let velocity = require_positive("V0", velocity)?;
        let turning_radius = require_positive("R", turning_radius)?;

        let fleet_size = fleet_size
            .filter(|n| *n >= 1.0 && n.fract() == 0.0)
            .ok_or_else(|| {
                SimulatorError::Config("N_uav must be a whole number >= 1".to_string())
            })? as u32;

        Ok(Self {
            dt,
            time_limit,
            fleet_size,
            initial: InitialState { x, y, z, velocity, azimuth_deg, turning_radius },
        })
    }
}

fn parse_entry(line: &str) -> Option<(&str, f64)> {
    let mut fields = line.split_whitespace();
    let key = fields.next()?;
    if fields.next()? != "=" {
        return None;
    }
    let value: f64 = fields.next()?.parse().ok()?;
    value.is_finite().then_some((key, value))
}

fn require_positive(key: &str, value: Option<f64>) -> Result<f64> {
    value
        .filter(|v| *v > 0.0)
        .ok_or_else(|| SimulatorError::Config(format!("{key} must be present and positive")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: &str = "\
Dt = 0.1
N_uav = 5
R = 50.0
X0 = 1.5
Y0 = -2.5
Z0 = 300.0
V0 = 20.0
Az = 45.0
TimeLim = 120.0
";

    #[test]
    fn test_parse_full_params() {
        let config = SimulationConfig::parse(PARAMS).unwrap();
        assert_eq!(config.dt, 0.1);
        assert_eq!(config.time_limit, 120.0);
        assert_eq!(config.fleet_size, 5);
        assert_eq!(config.initial.velocity, 20.0);
        assert_eq!(config.initial.turning_radius, 50.0);
        assert_eq!(config.initial.azimuth_deg, 45.0);
        assert_eq!(config.initial.z, 300.0);
    }

    #[test]
    fn test_optional_keys_default_to_zero() {
        let config =
            SimulationConfig::parse("Dt = 1.0\nTimeLim = 10\nN_uav = 1\nV0 = 10\nR = 50\n")
                .unwrap();
        assert_eq!(config.initial.x, 0.0);
        assert_eq!(config.initial.y, 0.0);
        assert_eq!(config.initial.azimuth_deg, 0.0);
    }

    #[test]
    fn test_missing_required_key_is_an_error() {
        let result = SimulationConfig::parse("Dt = 1.0\nTimeLim = 10\nN_uav = 1\nV0 = 10\n");
        assert!(matches!(result, Err(SimulatorError::Config(_))));
    }

    #[test]
    fn test_non_positive_dt_is_an_error() {
        let params = "Dt = 0.0\nTimeLim = 10\nN_uav = 1\nV0 = 10\nR = 50\n";
        assert!(SimulationConfig::parse(params).is_err());
    }

    #[test]
    fn test_fractional_fleet_size_is_an_error() {
        let params = "Dt = 1.0\nTimeLim = 10\nN_uav = 2.5\nV0 = 10\nR = 50\n";
        assert!(SimulationConfig::parse(params).is_err());
    }

    #[test]
    fn test_unknown_keys_and_garbage_lines_skipped() {
        let params = "Dt = 1.0\nTimeLim = 10\nN_uav = 1\nV0 = 10\nR = 50\nFoo = 9\nnot a line\n";
        assert!(SimulationConfig::parse(params).is_ok());
    }
}
